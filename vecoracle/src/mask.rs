// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

use crate::error::{Error, Result};

/// One predicate bit per lane.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MaskValue {
    bits: Vec<bool>,
}

impl MaskValue {
    pub fn from_bools(bits: Vec<bool>) -> Result<Self> {
        if bits.is_empty() {
            return Err(Error::InvalidLength(0));
        }
        Ok(Self { bits })
    }

    /// Reads `length` consecutive predicates starting at `offset`.
    pub fn from_array(array: &[bool], offset: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::InvalidLength(0));
        }
        let window = offset
            .checked_add(length)
            .and_then(|end| array.get(offset..end))
            .ok_or(Error::WindowOutOfRange {
                offset,
                length,
                len: array.len(),
            })?;
        Ok(Self {
            bits: window.to_vec(),
        })
    }

    pub fn all_true(length: usize) -> Result<Self> {
        Self::from_bools(vec![true; length])
    }

    pub fn all_false(length: usize) -> Result<Self> {
        Self::from_bools(vec![false; length])
    }

    /// Lane `i` is set iff `offset + i < limit`: the tail mask of a partial window.
    pub fn index_in_range(offset: usize, limit: usize, length: usize) -> Result<Self> {
        Self::from_bools(
            (0..length)
                .map(|i| offset.saturating_add(i) < limit)
                .collect(),
        )
    }

    /// Lane `i` takes bit `i` of `bits`. Bits at or above `length` are ignored.
    pub fn from_long(bits: u64, length: usize) -> Result<Self> {
        if length > 64 {
            return Err(Error::InvalidLength(length));
        }
        Self::from_bools((0..length).map(|i| bits >> i & 1 == 1).collect())
    }

    /// Packs lane `i` into bit `i`. Only masks of up to 64 lanes fit.
    pub fn to_long(&self) -> Result<u64> {
        if self.len() > 64 {
            return Err(Error::InvalidLength(self.len()));
        }
        Ok(self
            .bits
            .iter()
            .enumerate()
            .fold(0, |acc, (i, b)| acc | (*b as u64) << i))
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn bit(&self, i: usize) -> Result<bool> {
        self.bits.get(i).copied().ok_or(Error::OutOfRange {
            index: i as i64,
            len: self.len(),
        })
    }

    /// Unchecked lane read for callers that already validated the length.
    #[inline(always)]
    pub(crate) fn is_set(&self, i: usize) -> bool {
        self.bits[i]
    }

    pub fn true_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn first_true(&self) -> Option<usize> {
        self.bits.iter().position(|b| *b)
    }

    pub fn last_true(&self) -> Option<usize> {
        self.bits.iter().rposition(|b| *b)
    }

    pub fn any_true(&self) -> bool {
        self.bits.iter().any(|b| *b)
    }

    pub fn is_all_true(&self) -> bool {
        self.bits.iter().all(|b| *b)
    }

    pub fn ensure_len(&self, expected: usize) -> Result<()> {
        if self.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                found: self.len(),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &MaskValue, f: impl Fn(bool, bool) -> bool) -> Result<MaskValue> {
        other.ensure_len(self.len())?;
        Ok(MaskValue {
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> MaskValue {
        MaskValue {
            bits: self.bits.iter().map(|b| !b).collect(),
        }
    }

    pub fn and(&self, other: &MaskValue) -> Result<MaskValue> {
        self.zip_with(other, |a, b| a && b)
    }

    pub fn or(&self, other: &MaskValue) -> Result<MaskValue> {
        self.zip_with(other, |a, b| a || b)
    }

    pub fn xor(&self, other: &MaskValue) -> Result<MaskValue> {
        self.zip_with(other, |a, b| a != b)
    }

    pub fn and_not(&self, other: &MaskValue) -> Result<MaskValue> {
        self.zip_with(other, |a, b| a && !b)
    }

    /// Lane-wise equality of two masks.
    pub fn eq(&self, other: &MaskValue) -> Result<MaskValue> {
        self.zip_with(other, |a, b| a == b)
    }

    /// Sets the first `true_count()` lanes and clears the rest.
    pub fn compress(&self) -> MaskValue {
        let count = self.true_count();
        MaskValue {
            bits: (0..self.len()).map(|i| i < count).collect(),
        }
    }

    /// Re-shapes the mask to `target` lanes. Narrowing keeps the leading bits, widening pads
    /// with unset lanes. One length must divide the other.
    pub fn cast(&self, target: usize) -> Result<MaskValue> {
        let len = self.len();
        if target == 0 || (target % len != 0 && len % target != 0) {
            return Err(Error::IncompatibleMaskCast {
                from: len,
                to: target,
            });
        }
        Ok(MaskValue {
            bits: (0..target)
                .map(|i| self.bits.get(i).copied().unwrap_or(false))
                .collect(),
        })
    }
}

impl fmt::Debug for MaskValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MaskValue[")?;
        for b in &self.bits {
            f.write_str(if *b { "1" } else { "0" })?;
        }
        f.write_str("]")
    }
}
