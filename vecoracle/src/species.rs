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

/// A lane type paired with a vector width in bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Species {
    lane_type: LaneType,
    vector_bits: usize,
}

impl Species {
    /// S_64, S_128, S_256 and S_512.
    pub const STANDARD_BITS: [usize; 4] = [64, 128, 256, 512];

    pub fn new(lane_type: LaneType, vector_bits: usize) -> Result<Self> {
        let lane_bits = lane_type.bit_width() as usize;
        if vector_bits == 0 || vector_bits % lane_bits != 0 {
            return Err(Error::InvalidSpecies {
                lane_type,
                bits: vector_bits,
            });
        }
        Ok(Self {
            lane_type,
            vector_bits,
        })
    }

    pub fn of<T: Lane>(vector_bits: usize) -> Result<Self> {
        Self::new(T::LANE_TYPE, vector_bits)
    }

    pub fn lane_type(&self) -> LaneType {
        self.lane_type
    }

    pub fn vector_bits(&self) -> usize {
        self.vector_bits
    }

    /// Number of lanes in one vector.
    pub fn length(&self) -> usize {
        self.vector_bits / self.lane_type.bit_width() as usize
    }

    /// Largest multiple of `length()` not above `len`: where full-vector iteration stops.
    pub fn loop_bound(&self, len: usize) -> usize {
        len - len % self.length()
    }

    /// Tail mask for the window starting at `offset` of an array of `limit` elements.
    pub fn index_in_range(&self, offset: usize, limit: usize) -> Result<MaskValue> {
        MaskValue::index_in_range(offset, limit, self.length())
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} ({}-bit)", self.lane_type, self.length(), self.vector_bits)
    }
}
