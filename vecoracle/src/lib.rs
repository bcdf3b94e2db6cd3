// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Ground-truth evaluation of fixed-length SIMD vector operations.
//!
//! Vectors hold any positive number of 8/16/32/64-bit integer or 16/32/64-bit float lanes,
//! independent of a hardware register width. [`eval`] computes the correct result of every
//! lane-wise, reduction, comparison and cross-lane operation, masked or not, and [`harness`]
//! checks a system under test against it over generated inputs.

#![deny(unsafe_code)]

pub mod error;
pub mod eval;
pub mod harness;
pub mod lane;
pub mod lane_type;
pub mod mask;
pub mod ops;
pub mod species;
pub mod util;
pub mod vector;

pub use half::f16;

pub use error::{Error, Result};
pub use eval::{Evaluation, Operands, Operation, evaluate};
pub use lane::Lane;
pub use lane_type::{LaneKind, LaneType};
pub use mask::MaskValue;
pub use species::Species;
pub use vector::VectorValue;

/// Instantiates a generic `fn $name<T: Lane>()` as one `#[test]` per element type.
#[macro_export]
macro_rules! test_all_lane_types {
    (
        $name:ident
    ) => {
        $crate::test_integer_lane_types!($name);
        $crate::test_float_lane_types!($name);
    };
}

#[macro_export]
macro_rules! test_integer_lane_types {
    (
        $name:ident
    ) => {
        paste::paste! {
            #[test]
            fn [<$name _byte>]() {
                $name::<i8>()
            }
            #[test]
            fn [<$name _short>]() {
                $name::<i16>()
            }
            #[test]
            fn [<$name _int>]() {
                $name::<i32>()
            }
            #[test]
            fn [<$name _long>]() {
                $name::<i64>()
            }
        }
    };
}

#[macro_export]
macro_rules! test_float_lane_types {
    (
        $name:ident
    ) => {
        paste::paste! {
            #[test]
            fn [<$name _half>]() {
                $name::<$crate::f16>()
            }
            #[test]
            fn [<$name _float>]() {
                $name::<f32>()
            }
            #[test]
            fn [<$name _double>]() {
                $name::<f64>()
            }
        }
    };
}
