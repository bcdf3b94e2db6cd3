// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Element-wise operators. A masked lane-wise result keeps the first operand in every inactive
//! lane, and inactive lanes never trap.

use crate::{
    error::{Error, Result},
    lane::Lane,
    mask::MaskValue,
    ops::{BinaryOp, TernaryOp, UnaryOp},
    vector::VectorValue,
};

fn lift<T: Lane>(
    a: &VectorValue<T>,
    mask: Option<&MaskValue>,
    f: impl Fn(usize, T) -> Result<T>,
) -> Result<VectorValue<T>> {
    if let Some(mask) = mask {
        mask.ensure_len(a.len())?;
    }
    let lanes = a
        .lanes()
        .iter()
        .enumerate()
        .map(|(i, &x)| match mask {
            Some(mask) if !mask.is_set(i) => Ok(x),
            _ => f(i, x).map_err(|e| e.at_lane(i)),
        })
        .collect::<Result<Vec<_>>>()?;
    VectorValue::from_lanes(lanes)
}

pub fn unary<T: Lane>(
    op: UnaryOp,
    a: &VectorValue<T>,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    if !op.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(op, T::LANE_TYPE));
    }
    lift(a, mask, |_, x| T::unary(op, x))
}

pub fn binary<T: Lane>(
    op: BinaryOp,
    a: &VectorValue<T>,
    b: &VectorValue<T>,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    if !op.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(op, T::LANE_TYPE));
    }
    b.ensure_len(a.len())?;
    let b = b.lanes();
    lift(a, mask, |i, x| T::binary(op, x, b[i]))
}

/// Applies `op` with the same scalar as the second operand in every lane.
pub fn binary_scalar<T: Lane>(
    op: BinaryOp,
    a: &VectorValue<T>,
    scalar: T,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    if !op.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(op, T::LANE_TYPE));
    }
    lift(a, mask, |_, x| T::binary(op, x, scalar))
}

pub fn ternary<T: Lane>(
    op: TernaryOp,
    a: &VectorValue<T>,
    b: &VectorValue<T>,
    c: &VectorValue<T>,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    if !op.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(op, T::LANE_TYPE));
    }
    b.ensure_len(a.len())?;
    c.ensure_len(a.len())?;
    let (b, c) = (b.lanes(), c.lanes());
    lift(a, mask, |i, x| T::ternary(op, x, b[i], c[i]))
}

/// Shift or rotate every lane by an immediate amount, reduced modulo the lane width.
pub fn shift<T: Lane>(
    op: BinaryOp,
    a: &VectorValue<T>,
    amount: i64,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    if !op.is_shift() {
        return Err(Error::unsupported(format!("{op} by immediate"), T::LANE_TYPE));
    }
    let width = T::LANE_TYPE.bit_width() as i64;
    binary_scalar(op, a, T::from_i64(amount.rem_euclid(width)), mask)
}

/// `a + shift(b, amount)` or `a - shift(b, amount)`, the accumulate forms a vectorizer emits
/// for shift-and-add loops.
pub fn shift_accumulate<T: Lane>(
    accumulate: BinaryOp,
    shift_op: BinaryOp,
    a: &VectorValue<T>,
    b: &VectorValue<T>,
    amount: i64,
    mask: Option<&MaskValue>,
) -> Result<VectorValue<T>> {
    if !matches!(accumulate, BinaryOp::Add | BinaryOp::Sub) {
        return Err(Error::unsupported(
            format!("{accumulate} accumulation"),
            T::LANE_TYPE,
        ));
    }
    let shifted = shift(shift_op, b, amount, None)?;
    binary(accumulate, a, &shifted, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_all_lane_types;
    use test_log::test;

    fn vector<T: Lane>(lanes: &[T]) -> VectorValue<T> {
        VectorValue::from_lanes(lanes.to_vec()).unwrap()
    }

    fn mask(bits: &[u8]) -> MaskValue {
        MaskValue::from_bools(bits.iter().map(|b| *b != 0).collect()).unwrap()
    }

    #[test]
    fn test_saturating_add_bytes() {
        let a = vector(&[120i8, -120, 5, -5]);
        let b = vector(&[10i8, -10, 5, -5]);
        let r = binary(BinaryOp::SAdd, &a, &b, None).unwrap();
        assert_eq!(r.lanes(), &[127, -128, 10, -10]);
    }

    #[test]
    fn test_masked_add_keeps_left_operand() {
        let a = vector(&[1i32, 2, 3, 4]);
        let b = vector(&[10i32, 20, 30, 40]);
        let r = binary(BinaryOp::Add, &a, &b, Some(&mask(&[1, 0, 1, 0]))).unwrap();
        assert_eq!(r.lanes(), &[11, 2, 33, 4]);
    }

    #[test]
    fn test_division_traps_only_on_active_lanes() {
        let a = vector(&[8i16, 9, 10, 11]);
        let b = vector(&[2i16, 0, 5, 0]);
        assert_eq!(
            binary(BinaryOp::Div, &a, &b, None),
            Err(Error::DivisionByZero { lane: 1 })
        );
        let r = binary(BinaryOp::Div, &a, &b, Some(&mask(&[1, 0, 1, 0]))).unwrap();
        assert_eq!(r.lanes(), &[4, 9, 2, 11]);
        assert_eq!(
            binary(BinaryOp::Div, &a, &b, Some(&mask(&[1, 0, 1, 1]))),
            Err(Error::DivisionByZero { lane: 3 })
        );
    }

    #[test]
    fn test_shift_modulo_lane_width() {
        let a = vector(&[1i8, -1, 64, -128]);
        let by13 = shift(BinaryOp::Lshl, &a, 13, None).unwrap();
        let by5 = shift(BinaryOp::Lshl, &a, 5, None).unwrap();
        assert_eq!(by13, by5);
        let by8 = shift(BinaryOp::Lshr, &a, 8, None).unwrap();
        assert_eq!(by8, a);
        let neg = shift(BinaryOp::Ashr, &a, -1, None).unwrap();
        assert_eq!(neg.lanes(), &[0, -1, 0, -1]);
        let ints = vector(&[-16i32, 16]);
        assert_eq!(
            shift(BinaryOp::Lshr, &ints, 33, None).unwrap().lanes(),
            &[2147483640, 8]
        );
        assert!(shift(BinaryOp::Add, &ints, 1, None).is_err());
    }

    #[test]
    fn test_shift_accumulate() {
        let acc = vector(&[100i32, 100, 100, 100]);
        let b = vector(&[16i32, -16, 3, 0]);
        let r = shift_accumulate(BinaryOp::Add, BinaryOp::Ashr, &acc, &b, 2, None).unwrap();
        assert_eq!(r.lanes(), &[104, 96, 100, 100]);
        let r = shift_accumulate(
            BinaryOp::Sub,
            BinaryOp::Lshl,
            &acc,
            &b,
            1,
            Some(&mask(&[0, 1, 1, 1])),
        )
        .unwrap();
        assert_eq!(r.lanes(), &[100, 132, 94, 100]);
        assert!(shift_accumulate(BinaryOp::Mul, BinaryOp::Lshl, &acc, &b, 1, None).is_err());
    }

    #[test]
    fn test_float_lanes() {
        let a = vector(&[1.0f64, -0.0, f64::NAN, 4.0]);
        let b = vector(&[0.0f64, 0.0, 1.0, 2.0]);
        let r = binary(BinaryOp::Div, &a, &b, None).unwrap();
        assert_eq!(r.lanes()[0], f64::INFINITY);
        assert!(r.lanes()[1].is_nan());
        assert!(r.lanes()[2].is_nan());
        assert_eq!(r.lanes()[3], 2.0);
        let r = unary(UnaryOp::Sqrt, &vector(&[4.0f32, -1.0]), None).unwrap();
        assert_eq!(r.lanes()[0], 2.0);
        assert!(r.lanes()[1].is_nan());
        let fma = ternary(
            TernaryOp::Fma,
            &vector(&[2.0f32]),
            &vector(&[3.0f32]),
            &vector(&[1.0f32]),
            None,
        )
        .unwrap();
        assert_eq!(fma.lanes(), &[7.0]);
    }

    #[test]
    fn test_shape_and_support_errors() {
        let a = vector(&[1i32, 2, 3, 4]);
        let b = vector(&[1i32, 2]);
        assert_eq!(
            binary(BinaryOp::Add, &a, &b, None),
            Err(Error::ShapeMismatch {
                expected: 4,
                found: 2
            })
        );
        assert_eq!(
            binary(BinaryOp::Add, &a, &a, Some(&mask(&[1, 1]))),
            Err(Error::ShapeMismatch {
                expected: 4,
                found: 2
            })
        );
        let f = vector(&[1.0f32]);
        assert!(matches!(
            binary(BinaryOp::And, &f, &f, None),
            Err(Error::Unsupported { .. })
        ));
    }

    fn test_all_false_mask_is_identity<T: Lane>() {
        let a = VectorValue::<T>::iota(8).unwrap();
        let b = VectorValue::<T>::broadcast(T::one(), 8).unwrap();
        let none = MaskValue::all_false(8).unwrap();
        for &op in BinaryOp::ALL {
            if op.supports(T::LANE_TYPE) {
                assert!(binary(op, &a, &b, Some(&none)).unwrap().same(&a), "{op}");
            }
        }
        for &op in UnaryOp::ALL {
            if op.supports(T::LANE_TYPE) {
                assert!(unary(op, &a, Some(&none)).unwrap().same(&a), "{op}");
            }
        }
    }
    test_all_lane_types!(test_all_false_mask_is_identity);
}
