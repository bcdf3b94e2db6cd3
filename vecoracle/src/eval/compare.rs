// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    error::{Error, Result},
    lane::Lane,
    mask::MaskValue,
    ops::{CompareOp, TestOp},
    vector::VectorValue,
};

fn predicate<T: Lane>(
    a: &VectorValue<T>,
    mask: Option<&MaskValue>,
    f: impl Fn(usize, T) -> Result<bool>,
) -> Result<MaskValue> {
    if let Some(mask) = mask {
        mask.ensure_len(a.len())?;
    }
    let bits = a
        .lanes()
        .iter()
        .enumerate()
        .map(|(i, &x)| match mask {
            Some(mask) if !mask.is_set(i) => Ok(false),
            _ => f(i, x),
        })
        .collect::<Result<Vec<_>>>()?;
    MaskValue::from_bools(bits)
}

/// Lane-wise comparison. Inactive lanes compare false.
pub fn compare<T: Lane>(
    op: CompareOp,
    a: &VectorValue<T>,
    b: &VectorValue<T>,
    mask: Option<&MaskValue>,
) -> Result<MaskValue> {
    if !op.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(op, T::LANE_TYPE));
    }
    b.ensure_len(a.len())?;
    let b = b.lanes();
    predicate(a, mask, |i, x| T::compare(op, x, b[i]))
}

/// Lane-wise classification. Inactive lanes test false.
pub fn test<T: Lane>(op: TestOp, a: &VectorValue<T>, mask: Option<&MaskValue>) -> Result<MaskValue> {
    if !op.supports(T::LANE_TYPE) {
        return Err(Error::unsupported(op, T::LANE_TYPE));
    }
    predicate(a, mask, |_, x| T::test(op, x))
}
