// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod tracing_wrappers;

/// `a mod b` with the sign of the divisor, for `b > 0`.
#[inline(always)]
pub(crate) fn floor_mod(a: i64, b: i64) -> i64 {
    a.rem_euclid(b)
}
