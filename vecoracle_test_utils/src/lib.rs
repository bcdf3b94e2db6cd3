// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[macro_export]
macro_rules! assert_almost_eq {
    ($left:expr, $right:expr, $max_error:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                let diff = if *left_val > *right_val {
                    *left_val - *right_val
                } else {
                    *right_val - *left_val
                };
                if !(diff <= $max_error) {
                    panic!(
                        "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n max_error: `{:?}`",
                        left_val, right_val, $max_error
                    );
                }
            }
        }
    };
}

/// Lane-by-lane equality where NaN matches NaN and +0.0 does not match -0.0.
///
/// Works on anything that iterates over `PartialEq + Debug` lanes. Lanes are compared
/// as they are, so wide integers are checked exactly.
#[macro_export]
macro_rules! assert_lanes_eq {
    ($left:expr, $right:expr $(,)?) => {
        match (&$left, &$right) {
            (left_val, right_val) => {
                let left_lanes: Vec<_> = left_val.iter().collect();
                let right_lanes: Vec<_> = right_val.iter().collect();
                if left_lanes.len() != right_lanes.len() {
                    panic!(
                        "assertion failed: lane counts differ\n  left: `{:?}`,\n right: `{:?}`",
                        left_lanes, right_lanes
                    );
                }
                for (i, (l, r)) in left_lanes.iter().zip(&right_lanes).enumerate() {
                    #[allow(clippy::eq_op)]
                    let both_nan = *l != *l && *r != *r;
                    // Debug output tells -0.0 from 0.0, which `==` does not.
                    let same = *l == *r && format!("{:?}", l) == format!("{:?}", r);
                    if !(same || both_nan) {
                        panic!(
                            "assertion failed: lane {} differs\n  left: `{:?}`,\n right: `{:?}`",
                            i, left_lanes, right_lanes
                        );
                    }
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_with_floats() {
        assert_almost_eq!(1.0000001f64, 1.0000002, 0.000001);
        assert_almost_eq!(1.0, 1.1, 0.2);
    }

    #[test]
    fn test_with_integers() {
        assert_almost_eq!(100, 101, 2);
        assert_almost_eq!(500i64, 498, 3);
    }

    #[test]
    fn test_lanes() {
        assert_lanes_eq!([1.0f32, f32::NAN, -0.0], vec![1.0f32, f32::NAN, -0.0]);
        assert_lanes_eq!([1i8, -1], [1i8, -1]);
        assert_lanes_eq!(vec![i64::MIN, i64::MAX], [i64::MIN, i64::MAX]);
    }

    #[test]
    fn test_panic() {
        use std::panic;
        let result = panic::catch_unwind(|| {
            assert_almost_eq!(1.0, 1.2, 0.1);
        });
        assert!(result.is_err());

        let result = panic::catch_unwind(|| {
            assert_lanes_eq!([0.0f64], [-0.0f64]);
        });
        assert!(result.is_err());

        let result = panic::catch_unwind(|| {
            assert_lanes_eq!([1i32, 2], [1i32]);
        });
        assert!(result.is_err());

        let result = panic::catch_unwind(|| {
            assert_lanes_eq!([i64::MAX], [i64::MAX - 1]);
        });
        assert!(result.is_err());

        let result = panic::catch_unwind(|| {
            assert_lanes_eq!([u64::MAX, 0], vec![u64::MAX - 1, 0]);
        });
        assert!(result.is_err());
    }
}
