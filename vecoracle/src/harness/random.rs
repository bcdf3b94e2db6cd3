// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Input generators for harness cases.

use std::fmt;

use rand::Rng;

use crate::lane::Lane;

/// Source of randomness the generators draw from. Any [`Rng`] qualifies.
pub trait RandomSource: Rng {
    /// Uniform value in `[0, bound)`. `bound` must be positive.
    fn next_below(&mut self, bound: u64) -> u64 {
        self.random_range(0..bound)
    }

    fn next_bool(&mut self) -> bool {
        self.random_bool(0.5)
    }
}

impl<R: Rng + ?Sized> RandomSource for R {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputPattern {
    /// `-5 * i`
    NegScaled,
    /// `5 * i`
    Scaled,
    /// `i + 1`, never zero for short arrays.
    Incremented,
    /// Extreme values of the lane type, cycled.
    CornerCases,
    Random,
}

impl InputPattern {
    pub const ALL: [InputPattern; 5] = [
        InputPattern::NegScaled,
        InputPattern::Scaled,
        InputPattern::Incremented,
        InputPattern::CornerCases,
        InputPattern::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InputPattern::NegScaled => "neg-scaled",
            InputPattern::Scaled => "scaled",
            InputPattern::Incremented => "incremented",
            InputPattern::CornerCases => "corner-cases",
            InputPattern::Random => "random",
        }
    }

    pub fn generate<T: Lane>(self, len: usize, rng: &mut impl RandomSource) -> Vec<T> {
        (0..len)
            .map(|i| {
                let i64_index = i as i64;
                match self {
                    InputPattern::NegScaled => T::from_i64(i64_index.wrapping_mul(-5)),
                    InputPattern::Scaled => T::from_i64(i64_index.wrapping_mul(5)),
                    InputPattern::Incremented => T::from_i64(i64_index + 1),
                    InputPattern::CornerCases => T::corner_case(i),
                    InputPattern::Random => T::sample(rng),
                }
            })
            .collect()
    }
}

impl fmt::Display for InputPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    AllTrue,
    AllFalse,
    Alternating,
    Random,
}

impl MaskPattern {
    pub const ALL: [MaskPattern; 4] = [
        MaskPattern::AllTrue,
        MaskPattern::AllFalse,
        MaskPattern::Alternating,
        MaskPattern::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MaskPattern::AllTrue => "all-true",
            MaskPattern::AllFalse => "all-false",
            MaskPattern::Alternating => "alternating",
            MaskPattern::Random => "random",
        }
    }

    pub fn generate(self, len: usize, rng: &mut impl RandomSource) -> Vec<bool> {
        (0..len)
            .map(|i| match self {
                MaskPattern::AllTrue => true,
                MaskPattern::AllFalse => false,
                MaskPattern::Alternating => i % 2 == 0,
                MaskPattern::Random => rng.next_bool(),
            })
            .collect()
    }
}

impl fmt::Display for MaskPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// In-range lane indices for each window of `length` lanes.
pub fn shuffle_indices(len: usize, length: usize, rng: &mut impl RandomSource) -> Vec<i64> {
    (0..len)
        .map(|_| rng.next_below(length as u64) as i64)
        .collect()
}
