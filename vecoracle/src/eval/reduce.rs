// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    error::{Error, Result},
    lane::Lane,
    mask::MaskValue,
    ops::ReductionOp,
    vector::VectorValue,
};

impl ReductionOp {
    /// The value a reduction starts from; also the result of reducing no lanes.
    pub fn identity<T: Lane>(self) -> T {
        match self {
            ReductionOp::Add
            | ReductionOp::Or
            | ReductionOp::Xor
            | ReductionOp::UMax
            | ReductionOp::SUAdd
            | ReductionOp::FirstNonzero => T::zero(),
            ReductionOp::Mul => T::one(),
            ReductionOp::And | ReductionOp::UMin => T::all_ones(),
            ReductionOp::Min => T::upper_bound(),
            ReductionOp::Max => T::lower_bound(),
        }
    }
}

/// Folds the active lanes from lane 0 upward, starting at the identity of `op`.
pub fn reduce<T: Lane>(op: ReductionOp, a: &VectorValue<T>, mask: Option<&MaskValue>) -> Result<T> {
    if !op.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(op, T::LANE_TYPE));
    }
    if let Some(mask) = mask {
        mask.ensure_len(a.len())?;
    }
    let step = op.step();
    a.lanes()
        .iter()
        .enumerate()
        .filter(|(i, _)| mask.is_none_or(|m| m.is_set(*i)))
        .try_fold(op.identity::<T>(), |acc, (_, &x)| T::binary(step, acc, x))
}
