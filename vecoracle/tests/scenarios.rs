// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use test_log::test;
use vecoracle::{
    Error, Evaluation, MaskValue, Operands, Operation, VectorValue, evaluate,
    eval::{compare, lanewise, movement},
    ops::{BinaryOp, CompareOp, ReductionOp, TernaryOp},
};
use vecoracle_test_utils::{assert_almost_eq, assert_lanes_eq};

fn vector<T: vecoracle::Lane>(lanes: &[T]) -> VectorValue<T> {
    VectorValue::from_lanes(lanes.to_vec()).unwrap()
}

#[test]
fn saturating_byte_arithmetic() {
    let a = vector(&[127i8, -128, 0, 10]);
    let b = vector(&[100i8, 100, 100, 10]);
    let sum = lanewise::binary(BinaryOp::SAdd, &a, &b, None).unwrap();
    let difference = lanewise::binary(BinaryOp::SSub, &a, &b, None).unwrap();
    assert_lanes_eq!(sum.lanes(), [127i8, -28, 100, 20]);
    assert_lanes_eq!(difference.lanes(), [27i8, -128, -100, 0]);
}

#[test]
fn logical_shift_wraps_amount() {
    let a = vector(&[5i32, -5]);
    let by33 = lanewise::shift(BinaryOp::Lshr, &a, 33, None).unwrap();
    let by1 = lanewise::shift(BinaryOp::Lshr, &a, 1, None).unwrap();
    assert_eq!(by33, by1);
    assert_lanes_eq!(by33.lanes(), [2i32, 2147483645]);
}

#[test]
fn fused_multiply_add_is_exact() {
    let vectors = [vector(&[2.0f32]), vector(&[3.0f32]), vector(&[4.0f32])];
    let result = evaluate(&Operation::Ternary(TernaryOp::Fma), &Operands::new(&vectors)).unwrap();
    assert_eq!(result, Evaluation::Vector(vector(&[10.0f32])));
}

#[test]
fn select_from_in_range_indices_is_identity() {
    let index = vector(&[0i64, 1, 2, 3]);
    let v1 = vector(&[10i64, 11, 12, 13]);
    let v2 = vector(&[20i64, 21, 22, 23]);
    assert_eq!(movement::select_from(&index, &v1, &v2).unwrap(), v1);
}

#[test]
fn unsigned_and_signed_views_of_the_same_bits() {
    let raw = vector(&[-1i8]); // 0xFF
    let one = vector(&[1i8]);
    let unsigned_gt = compare::compare(CompareOp::UnsignedGt, &raw, &one, None).unwrap();
    let signed_lt = compare::compare(CompareOp::Lt, &raw, &one, None).unwrap();
    assert!(unsigned_gt.bit(0).unwrap());
    assert!(signed_lt.bit(0).unwrap());
}

#[test]
fn saturation_bounds_at_type_limits() {
    let max = vector(&[i16::MAX, i16::MAX]);
    let min = vector(&[i16::MIN, i16::MIN]);
    let positive = vector(&[1i16, i16::MAX]);
    assert_eq!(lanewise::binary(BinaryOp::SAdd, &max, &positive, None).unwrap(), max);
    assert_eq!(lanewise::binary(BinaryOp::SSub, &min, &positive, None).unwrap(), min);
    let all_ones = vector(&[-1i16, -1]);
    let zero = vector(&[0i16, 0]);
    assert_eq!(
        lanewise::binary(BinaryOp::SUAdd, &all_ones, &positive, None).unwrap(),
        all_ones
    );
    assert_eq!(lanewise::binary(BinaryOp::SUSub, &zero, &positive, None).unwrap(), zero);
}

#[test]
fn inactive_lane_policies_differ_by_operation() {
    let data = [1i32, 2, 3, 4];
    let mask = MaskValue::from_bools(vec![true, false, true, false]).unwrap();
    let a = vector(&data);
    let b = vector(&[10i32, 20, 30, 40]);

    // Arithmetic keeps the left operand.
    let sum = lanewise::binary(BinaryOp::Add, &a, &b, Some(&mask)).unwrap();
    assert_lanes_eq!(sum.lanes(), [11i32, 2, 33, 4]);

    // Gather reads zero.
    let gathered =
        VectorValue::from_array_gather(&data, 0, &[3, 1000, 1, -1000], 4, Some(&mask)).unwrap();
    assert_lanes_eq!(gathered.lanes(), [4i32, 0, 2, 0]);

    // Store leaves the destination alone.
    let mut dest = [-7i32; 4];
    b.into_array(&mut dest, 0, Some(&mask)).unwrap();
    assert_lanes_eq!(dest, [10i32, -7, 30, -7]);

    // Compare reads false.
    let eq = compare::compare(CompareOp::Eq, &a, &a, Some(&mask)).unwrap();
    assert_eq!(eq, mask);
}

#[test]
fn partial_window_with_tail_mask() {
    let data: Vec<f32> = (0..10).map(|i| i as f32 * 0.5).collect();
    let species = vecoracle::Species::of::<f32>(128).unwrap();
    let mut out = vec![0.0f32; data.len()];
    let mut total = 0.0f32;
    let mut offset = 0;
    while offset < data.len() {
        let tail = species.index_in_range(offset, data.len()).unwrap();
        let v = VectorValue::from_array_masked(&data, offset, species.length(), &tail).unwrap();
        let doubled = lanewise::binary(BinaryOp::Add, &v, &v, Some(&tail)).unwrap();
        doubled.into_array(&mut out, offset, Some(&tail)).unwrap();
        total += vecoracle::eval::reduce::reduce(ReductionOp::Add, &v, Some(&tail)).unwrap();
        offset += species.length();
    }
    let expected: Vec<f32> = data.iter().map(|x| x * 2.0).collect();
    assert_lanes_eq!(out, expected);
    assert_almost_eq!(total, 22.5f32, 1e-6);
}

#[test]
fn division_by_zero_names_the_lane() {
    let vectors = [vector(&[1i64, 2, 3]), vector(&[1i64, 1, 0])];
    assert_eq!(
        evaluate(&Operation::Binary(BinaryOp::Div), &Operands::new(&vectors)),
        Err(Error::DivisionByZero { lane: 2 })
    );
    let floats = [vector(&[1.0f64, -1.0]), vector(&[0.0f64, 0.0])];
    let Evaluation::Vector(quotient) =
        evaluate(&Operation::Binary(BinaryOp::Div), &Operands::new(&floats)).unwrap()
    else {
        unreachable!()
    };
    assert_lanes_eq!(quotient.lanes(), [f64::INFINITY, f64::NEG_INFINITY]);
}
