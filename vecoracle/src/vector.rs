// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt;

use crate::{
    error::{Error, Result},
    lane::Lane,
    lane_type::LaneType,
    mask::MaskValue,
};

/// A fixed-length sequence of lanes. Lane 0 is the lowest lane. The length is independent of
/// any hardware register width.
#[derive(Clone, PartialEq)]
pub struct VectorValue<T: Lane> {
    lanes: Vec<T>,
}

/// Resolves `base + index` into an array of `len` elements.
fn resolve(base: usize, index: i64, len: usize) -> Result<usize> {
    let absolute = (base as i64).saturating_add(index);
    if absolute < 0 || absolute as u64 >= len as u64 {
        return Err(Error::OutOfRange {
            index: absolute,
            len,
        });
    }
    Ok(absolute as usize)
}

fn check_window(offset: usize, length: usize, len: usize) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::WindowOutOfRange {
            offset,
            length,
            len,
        }),
    }
}

impl<T: Lane> VectorValue<T> {
    pub fn from_lanes(lanes: Vec<T>) -> Result<Self> {
        if lanes.is_empty() {
            return Err(Error::InvalidLength(0));
        }
        Ok(Self { lanes })
    }

    /// Snapshot of `length` consecutive elements starting at `offset`.
    pub fn from_array(array: &[T], offset: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(Error::InvalidLength(0));
        }
        check_window(offset, length, array.len())?;
        Ok(Self {
            lanes: array[offset..offset + length].to_vec(),
        })
    }

    /// Masked contiguous load. Inactive lanes read as zero and are not bounds checked.
    pub fn from_array_masked(
        array: &[T],
        offset: usize,
        length: usize,
        mask: &MaskValue,
    ) -> Result<Self> {
        mask.ensure_len(length)?;
        let lanes = (0..length)
            .map(|i| {
                if !mask.is_set(i) {
                    return Ok(T::zero());
                }
                let index = resolve(offset, i as i64, array.len())?;
                Ok(array[index])
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_lanes(lanes)
    }

    /// Lane `i` is `array[base + indices[i]]`. With a mask, inactive lanes read as zero and
    /// their indices are never resolved.
    pub fn from_array_gather(
        array: &[T],
        base: usize,
        indices: &[i64],
        length: usize,
        mask: Option<&MaskValue>,
    ) -> Result<Self> {
        if indices.len() != length {
            return Err(Error::ShapeMismatch {
                expected: length,
                found: indices.len(),
            });
        }
        if let Some(mask) = mask {
            mask.ensure_len(length)?;
        }
        let lanes = indices
            .iter()
            .enumerate()
            .map(|(i, &index)| {
                if mask.is_some_and(|m| !m.is_set(i)) {
                    return Ok(T::zero());
                }
                Ok(array[resolve(base, index, array.len())?])
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_lanes(lanes)
    }

    pub fn broadcast(value: T, length: usize) -> Result<Self> {
        Self::from_lanes(vec![value; length])
    }

    pub fn zero(length: usize) -> Result<Self> {
        Self::broadcast(T::zero(), length)
    }

    /// Lane `i` holds `i`, wrapped to the lane type.
    pub fn iota(length: usize) -> Result<Self> {
        Self::from_lanes((0..length).map(|i| T::from_i64(i as i64)).collect())
    }

    /// Contiguous store at `offset`. With a mask, inactive lanes leave `dest` untouched and are
    /// not bounds checked. Nothing is written if any active lane is out of range.
    pub fn into_array(&self, dest: &mut [T], offset: usize, mask: Option<&MaskValue>) -> Result<()> {
        match mask {
            None => {
                check_window(offset, self.len(), dest.len())?;
                dest[offset..offset + self.len()].copy_from_slice(&self.lanes);
            }
            Some(mask) => {
                mask.ensure_len(self.len())?;
                let targets = (0..self.len())
                    .filter(|&i| mask.is_set(i))
                    .map(|i| Ok((i, resolve(offset, i as i64, dest.len())?)))
                    .collect::<Result<Vec<_>>>()?;
                for (lane, index) in targets {
                    dest[index] = self.lanes[lane];
                }
            }
        }
        Ok(())
    }

    /// Scatter store: lane `i` goes to `dest[base + indices[i]]`. Later lanes win when indices
    /// collide. Nothing is written if any active lane is out of range.
    pub fn into_array_scatter(
        &self,
        dest: &mut [T],
        base: usize,
        indices: &[i64],
        mask: Option<&MaskValue>,
    ) -> Result<()> {
        if indices.len() != self.len() {
            return Err(Error::ShapeMismatch {
                expected: self.len(),
                found: indices.len(),
            });
        }
        if let Some(mask) = mask {
            mask.ensure_len(self.len())?;
        }
        let targets = indices
            .iter()
            .enumerate()
            .filter(|(i, _)| mask.is_none_or(|m| m.is_set(*i)))
            .map(|(i, &index)| Ok((i, resolve(base, index, dest.len())?)))
            .collect::<Result<Vec<_>>>()?;
        for (lane, index) in targets {
            dest[index] = self.lanes[lane];
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn lanes(&self) -> &[T] {
        &self.lanes
    }

    pub fn into_lanes(self) -> Vec<T> {
        self.lanes
    }

    pub fn lane_type(&self) -> LaneType {
        T::LANE_TYPE
    }

    pub fn lane(&self, i: usize) -> Result<T> {
        self.lanes.get(i).copied().ok_or(Error::OutOfRange {
            index: i as i64,
            len: self.len(),
        })
    }

    /// Copy of `self` with lane `i` replaced.
    pub fn with_lane(&self, i: usize, value: T) -> Result<Self> {
        let mut lanes = self.lanes.clone();
        let len = lanes.len();
        *lanes.get_mut(i).ok_or(Error::OutOfRange {
            index: i as i64,
            len,
        })? = value;
        Ok(Self { lanes })
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

    /// Lane-wise [`Lane::same`]: NaNs compare equal, signed zeros do not.
    pub fn same(&self, other: &Self) -> bool {
        self.len() == other.len() && self.lanes.iter().zip(&other.lanes).all(|(a, b)| a.same(*b))
    }
}

impl<T: Lane> fmt::Debug for VectorValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VectorValue<{}>{:?}", T::LANE_TYPE, self.lanes)
    }
}
