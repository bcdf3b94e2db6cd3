// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The operation evaluator: width-parameterized ground truth for every vector operation.
//!
//! Each category lives in its own module and can be called directly. [`evaluate`] dispatches a
//! first-class [`Operation`] over a bundle of [`Operands`], which is what the harness uses to
//! enumerate and check operations generically.

pub mod compare;
pub mod lanewise;
pub mod movement;
pub mod reduce;

use std::fmt;

use crate::{
    error::{Error, Result},
    lane::Lane,
    lane_type::LaneType,
    mask::MaskValue,
    ops::{BinaryOp, CompareOp, ReductionOp, TernaryOp, TestOp, UnaryOp},
    util::tracing_wrappers::*,
    vector::VectorValue,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Unary(UnaryOp),
    Binary(BinaryOp),
    Ternary(TernaryOp),
    /// Shift or rotate every lane by the same immediate amount.
    ShiftImmediate(BinaryOp, i64),
    /// `a (+|-) shift(b, amount)`.
    ShiftAccumulate {
        accumulate: BinaryOp,
        shift: BinaryOp,
        amount: i64,
    },
    Compare(CompareOp),
    Test(TestOp),
    Reduce(ReductionOp),
    Slice(usize),
    SliceUnary(usize),
    Unslice {
        origin: usize,
        part: usize,
    },
    UnsliceUnary(usize),
    /// Operands: index vector, first table, second table.
    SelectFrom,
    Rearrange,
    Blend,
    Compress,
    Expand,
}

impl Operation {
    /// Name without parameters, e.g. `LSHL` for a shift by 13.
    pub fn base_name(&self) -> String {
        match self {
            Operation::Unary(op) => op.name().to_string(),
            Operation::Binary(op) | Operation::ShiftImmediate(op, _) => op.name().to_string(),
            Operation::Ternary(op) => op.name().to_string(),
            Operation::ShiftAccumulate {
                accumulate, shift, ..
            } => format!("{accumulate}_{shift}"),
            Operation::Compare(op) => format!("COMPARE_{op}"),
            Operation::Test(op) => format!("TEST_{op}"),
            Operation::Reduce(op) => format!("{op}_REDUCE"),
            Operation::Slice(_) => "SLICE".to_string(),
            Operation::SliceUnary(_) => "SLICE_UNARY".to_string(),
            Operation::Unslice { .. } => "UNSLICE".to_string(),
            Operation::UnsliceUnary(_) => "UNSLICE_UNARY".to_string(),
            Operation::SelectFrom => "SELECT_FROM".to_string(),
            Operation::Rearrange => "REARRANGE".to_string(),
            Operation::Blend => "BLEND".to_string(),
            Operation::Compress => "COMPRESS".to_string(),
            Operation::Expand => "EXPAND".to_string(),
        }
    }

    /// Number of vector operands.
    pub fn arity(&self) -> usize {
        match self {
            Operation::Unary(_)
            | Operation::ShiftImmediate(..)
            | Operation::Test(_)
            | Operation::Reduce(_)
            | Operation::SliceUnary(_)
            | Operation::UnsliceUnary(_)
            | Operation::Rearrange
            | Operation::Compress
            | Operation::Expand => 1,
            Operation::Binary(_)
            | Operation::ShiftAccumulate { .. }
            | Operation::Compare(_)
            | Operation::Slice(_)
            | Operation::Unslice { .. }
            | Operation::Blend => 2,
            Operation::Ternary(_) | Operation::SelectFrom => 3,
        }
    }

    pub fn accepts_mask(&self) -> bool {
        !matches!(
            self,
            Operation::SelectFrom | Operation::SliceUnary(_) | Operation::UnsliceUnary(_)
        )
    }

    pub fn requires_mask(&self) -> bool {
        matches!(
            self,
            Operation::Blend | Operation::Compress | Operation::Expand
        )
    }

    pub fn requires_shuffle(&self) -> bool {
        matches!(self, Operation::Rearrange)
    }

    /// Whether `evaluate` may trap with a division by zero.
    pub fn may_divide_by_zero(&self, lane_type: LaneType) -> bool {
        matches!(self, Operation::Binary(BinaryOp::Div)) && lane_type.is_integer()
    }

    pub fn supports(&self, lane_type: LaneType) -> bool {
        match self {
            Operation::Unary(op) => op.supports(lane_type),
            Operation::Binary(op) => op.supports(lane_type),
            Operation::Ternary(op) => op.supports(lane_type),
            Operation::ShiftImmediate(op, _) => op.is_shift() && op.supports(lane_type),
            Operation::ShiftAccumulate {
                accumulate, shift, ..
            } => {
                matches!(accumulate, BinaryOp::Add | BinaryOp::Sub)
                    && shift.is_shift()
                    && shift.supports(lane_type)
            }
            Operation::Compare(op) => op.supports(lane_type),
            Operation::Test(op) => op.supports(lane_type),
            Operation::Reduce(op) => op.supports(lane_type),
            Operation::Slice(_)
            | Operation::SliceUnary(_)
            | Operation::Unslice { .. }
            | Operation::UnsliceUnary(_)
            | Operation::SelectFrom
            | Operation::Rearrange
            | Operation::Blend
            | Operation::Compress
            | Operation::Expand => true,
        }
    }

    /// Every operation defined for `lane_type` on vectors of `length` lanes, with a spread of
    /// immediate shift amounts and slice origins.
    pub fn catalog(lane_type: LaneType, length: usize) -> Vec<Operation> {
        let width = lane_type.bit_width() as i64;
        let mut origins = vec![0, 1, length / 2, length];
        origins.retain(|o| *o <= length);
        origins.sort_unstable();
        origins.dedup();

        let mut ops = Vec::new();
        ops.extend(UnaryOp::ALL.iter().map(|op| Operation::Unary(*op)));
        ops.extend(BinaryOp::ALL.iter().map(|op| Operation::Binary(*op)));
        ops.extend(TernaryOp::ALL.iter().map(|op| Operation::Ternary(*op)));
        for op in BinaryOp::ALL.iter().filter(|op| op.is_shift()) {
            for amount in [1, width - 1, width + 5, -1] {
                ops.push(Operation::ShiftImmediate(*op, amount));
            }
        }
        for (accumulate, shift) in [
            (BinaryOp::Add, BinaryOp::Lshr),
            (BinaryOp::Add, BinaryOp::Ashr),
            (BinaryOp::Sub, BinaryOp::Lshl),
        ] {
            ops.push(Operation::ShiftAccumulate {
                accumulate,
                shift,
                amount: 3,
            });
        }
        ops.extend(CompareOp::ALL.iter().map(|op| Operation::Compare(*op)));
        ops.extend(TestOp::ALL.iter().map(|op| Operation::Test(*op)));
        ops.extend(ReductionOp::ALL.iter().map(|op| Operation::Reduce(*op)));
        for &origin in &origins {
            ops.push(Operation::Slice(origin));
            ops.push(Operation::SliceUnary(origin));
            ops.push(Operation::UnsliceUnary(origin));
            for part in 0..2 {
                ops.push(Operation::Unslice { origin, part });
            }
        }
        ops.extend([
            Operation::SelectFrom,
            Operation::Rearrange,
            Operation::Blend,
            Operation::Compress,
            Operation::Expand,
        ]);
        ops.retain(|op| op.supports(lane_type));
        ops
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_name())?;
        match self {
            Operation::ShiftImmediate(_, amount)
            | Operation::ShiftAccumulate { amount, .. } => write!(f, "#{amount}"),
            Operation::Slice(origin)
            | Operation::SliceUnary(origin)
            | Operation::UnsliceUnary(origin) => write!(f, "@{origin}"),
            Operation::Unslice { origin, part } => write!(f, "@{origin}/{part}"),
            _ => Ok(()),
        }
    }
}

/// Inputs to one evaluation. All vectors must have the same length.
#[derive(Clone, Copy, Debug)]
pub struct Operands<'a, T: Lane> {
    pub vectors: &'a [VectorValue<T>],
    pub mask: Option<&'a MaskValue>,
    pub shuffle: Option<&'a [i64]>,
}

impl<'a, T: Lane> Operands<'a, T> {
    pub fn new(vectors: &'a [VectorValue<T>]) -> Self {
        Self {
            vectors,
            mask: None,
            shuffle: None,
        }
    }

    pub fn with_mask(self, mask: &'a MaskValue) -> Self {
        Self {
            mask: Some(mask),
            ..self
        }
    }

    pub fn with_shuffle(self, shuffle: &'a [i64]) -> Self {
        Self {
            shuffle: Some(shuffle),
            ..self
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation<T: Lane> {
    Vector(VectorValue<T>),
    Mask(MaskValue),
    Scalar(T),
}

impl<T: Lane> Evaluation<T> {
    /// Exact comparison: NaNs match, signed zeros do not.
    pub fn same(&self, other: &Evaluation<T>) -> bool {
        match (self, other) {
            (Evaluation::Vector(a), Evaluation::Vector(b)) => a.same(b),
            (Evaluation::Mask(a), Evaluation::Mask(b)) => a == b,
            (Evaluation::Scalar(a), Evaluation::Scalar(b)) => a.same(*b),
            _ => false,
        }
    }
}

fn required<'a, X: ?Sized>(
    value: Option<&'a X>,
    operation: &Operation,
    what: &'static str,
) -> Result<&'a X> {
    value.ok_or_else(|| Error::MissingOperand {
        op: operation.to_string(),
        what,
    })
}

/// Computes the ground-truth result of `operation` on `operands`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "trace", skip(operands), fields(lane_type = %T::LANE_TYPE), err)
)]
pub fn evaluate<T: Lane>(operation: &Operation, operands: &Operands<T>) -> Result<Evaluation<T>> {
    if !operation.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(operation, T::LANE_TYPE));
    }
    let v = operands.vectors;
    if v.len() != operation.arity() {
        return Err(Error::Arity {
            expected: operation.arity(),
            found: v.len(),
        });
    }
    let mask = operands.mask;
    if mask.is_some() && !operation.accepts_mask() {
        return Err(Error::unsupported(
            format!("masked {operation}"),
            T::LANE_TYPE,
        ));
    }
    if operation.requires_mask() {
        required(mask, operation, "a mask")?;
    }
    if operation.requires_shuffle() {
        required(operands.shuffle, operation, "a shuffle")?;
    }
    let length = v[0].len();
    for vector in &v[1..] {
        vector.ensure_len(length)?;
    }
    trace!(length, masked = mask.is_some(), "evaluating");

    let result = match *operation {
        Operation::Unary(op) => Evaluation::Vector(lanewise::unary(op, &v[0], mask)?),
        Operation::Binary(op) => Evaluation::Vector(lanewise::binary(op, &v[0], &v[1], mask)?),
        Operation::Ternary(op) => {
            Evaluation::Vector(lanewise::ternary(op, &v[0], &v[1], &v[2], mask)?)
        }
        Operation::ShiftImmediate(op, amount) => {
            Evaluation::Vector(lanewise::shift(op, &v[0], amount, mask)?)
        }
        Operation::ShiftAccumulate {
            accumulate,
            shift,
            amount,
        } => Evaluation::Vector(lanewise::shift_accumulate(
            accumulate, shift, &v[0], &v[1], amount, mask,
        )?),
        Operation::Compare(op) => Evaluation::Mask(compare::compare(op, &v[0], &v[1], mask)?),
        Operation::Test(op) => Evaluation::Mask(compare::test(op, &v[0], mask)?),
        Operation::Reduce(op) => Evaluation::Scalar(reduce::reduce(op, &v[0], mask)?),
        Operation::Slice(origin) => {
            Evaluation::Vector(movement::slice(origin, &v[0], &v[1], mask)?)
        }
        Operation::SliceUnary(origin) => {
            Evaluation::Vector(movement::slice_unary(origin, &v[0])?)
        }
        Operation::Unslice { origin, part } => {
            Evaluation::Vector(movement::unslice(origin, &v[0], &v[1], part, mask)?)
        }
        Operation::UnsliceUnary(origin) => {
            Evaluation::Vector(movement::unslice_unary(origin, &v[0])?)
        }
        Operation::SelectFrom => {
            Evaluation::Vector(movement::select_from(&v[0], &v[1], &v[2])?)
        }
        Operation::Rearrange => {
            let shuffle = required(operands.shuffle, operation, "a shuffle")?;
            Evaluation::Vector(movement::rearrange(&v[0], shuffle, mask)?)
        }
        Operation::Blend => {
            let mask = required(mask, operation, "a mask")?;
            Evaluation::Vector(movement::blend(&v[0], &v[1], mask)?)
        }
        Operation::Compress => {
            let mask = required(mask, operation, "a mask")?;
            Evaluation::Vector(movement::compress(&v[0], mask)?)
        }
        Operation::Expand => {
            let mask = required(mask, operation, "a mask")?;
            Evaluation::Vector(movement::expand(&v[0], mask)?)
        }
    };
    Ok(result)
}
