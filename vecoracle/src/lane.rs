// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Scalar semantics of a single lane.
//!
//! Every opcode is defined here once per element type; the vector evaluator only lifts these
//! functions across lanes. Integer lanes wrap modulo 2^width, float lanes follow IEEE-754.
//! Half-precision arithmetic is computed in `f32` and rounded once, which is exact for the
//! basic operations since `f32` carries more than twice the precision of `f16`.

use std::{cmp::Ordering, fmt::Debug};

use half::f16;
use num_traits::{Float, One, Zero};
use rand::Rng;

use crate::{
    error::{Error, Result},
    lane_type::LaneType,
    ops::{BinaryOp, CompareOp, TernaryOp, TestOp, UnaryOp},
};

pub trait Lane:
    Sized + Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + 'static
{
    const LANE_TYPE: LaneType;

    fn zero() -> Self;

    fn one() -> Self;

    /// Largest value for MIN reductions: `MAX` for integers, `+inf` for floats.
    fn upper_bound() -> Self;

    /// Smallest value for MAX reductions: `MIN` for integers, `-inf` for floats.
    fn lower_bound() -> Self;

    /// Raw bit pattern, zero-extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Truncates `bits` to the lane width and reinterprets it.
    fn from_bits(bits: u64) -> Self;

    fn all_ones() -> Self {
        Self::from_bits(u64::MAX)
    }

    /// Wrapping conversion for integers, nearest value for floats.
    fn from_i64(value: i64) -> Self;

    /// Integer value used when the lane is interpreted as an index. Floats truncate toward zero.
    fn to_index(self) -> i64;

    fn to_f64(self) -> f64;

    /// Draws a random lane value. Integers use the full range; floats land in
    /// [-1024, 1024) so that random inputs are mostly finite and non-NaN.
    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Cycles through the extreme values of the type.
    fn corner_case(i: usize) -> Self;

    /// Exact lane equality as seen by an oracle: NaNs match each other, signed zeros do not.
    fn same(self, other: Self) -> bool;

    fn unary(op: UnaryOp, a: Self) -> Result<Self>;

    fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self>;

    fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self>;

    fn compare(op: CompareOp, a: Self, b: Self) -> Result<bool>;

    fn test(op: TestOp, a: Self) -> Result<bool>;
}

macro_rules! impl_int_lane {
    ($t:ty, $u:ty, $lane_type:expr) => {
        impl Lane for $t {
            const LANE_TYPE: LaneType = $lane_type;

            #[inline(always)]
            fn zero() -> Self {
                0
            }

            #[inline(always)]
            fn one() -> Self {
                1
            }

            #[inline(always)]
            fn upper_bound() -> Self {
                <$t>::MAX
            }

            #[inline(always)]
            fn lower_bound() -> Self {
                <$t>::MIN
            }

            #[inline(always)]
            fn to_bits(self) -> u64 {
                self as $u as u64
            }

            #[inline(always)]
            fn from_bits(bits: u64) -> Self {
                bits as $u as $t
            }

            #[inline(always)]
            fn from_i64(value: i64) -> Self {
                value as $t
            }

            #[inline(always)]
            fn to_index(self) -> i64 {
                self as i64
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
                rng.random()
            }

            fn corner_case(i: usize) -> Self {
                [<$t>::MAX, <$t>::MIN, <$t>::MIN, <$t>::MAX, 0][i % 5]
            }

            #[inline(always)]
            fn same(self, other: Self) -> bool {
                self == other
            }

            fn unary(op: UnaryOp, a: Self) -> Result<Self> {
                let ua = a as $u;
                Ok(match op {
                    UnaryOp::Neg => a.wrapping_neg(),
                    UnaryOp::Abs => a.wrapping_abs(),
                    UnaryOp::Not => !a,
                    UnaryOp::Zomo => {
                        if a == 0 {
                            0
                        } else {
                            -1
                        }
                    }
                    UnaryOp::BitCount => ua.count_ones() as $t,
                    UnaryOp::LeadingZerosCount => ua.leading_zeros() as $t,
                    UnaryOp::TrailingZerosCount => ua.trailing_zeros() as $t,
                    UnaryOp::Reverse => ua.reverse_bits() as $t,
                    UnaryOp::ReverseBytes => ua.swap_bytes() as $t,
                    UnaryOp::Sqrt => return Err(Error::unsupported(op, Self::LANE_TYPE)),
                })
            }

            fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self> {
                let (ua, ub) = (a as $u, b as $u);
                // The lane width is a power of two, so this is the Euclidean remainder of the
                // signed amount as well.
                let amount = (ub % (<$u>::BITS as $u)) as u32;
                Ok(match op {
                    BinaryOp::Add => a.wrapping_add(b),
                    BinaryOp::Sub => a.wrapping_sub(b),
                    BinaryOp::Mul => a.wrapping_mul(b),
                    BinaryOp::Div => {
                        if b == 0 {
                            return Err(Error::DivisionByZero { lane: 0 });
                        }
                        a.wrapping_div(b)
                    }
                    BinaryOp::Min => a.min(b),
                    BinaryOp::Max => a.max(b),
                    BinaryOp::UMin => ua.min(ub) as $t,
                    BinaryOp::UMax => ua.max(ub) as $t,
                    BinaryOp::And => a & b,
                    BinaryOp::Or => a | b,
                    BinaryOp::Xor => a ^ b,
                    BinaryOp::AndNot => a & !b,
                    BinaryOp::FirstNonzero => {
                        if a != 0 {
                            a
                        } else {
                            b
                        }
                    }
                    BinaryOp::SAdd => a.saturating_add(b),
                    BinaryOp::SSub => a.saturating_sub(b),
                    BinaryOp::SUAdd => ua.saturating_add(ub) as $t,
                    BinaryOp::SUSub => ua.saturating_sub(ub) as $t,
                    BinaryOp::Lshl => a << amount,
                    BinaryOp::Lshr => (ua >> amount) as $t,
                    BinaryOp::Ashr => a >> amount,
                    BinaryOp::Rol => ua.rotate_left(amount) as $t,
                    BinaryOp::Ror => ua.rotate_right(amount) as $t,
                })
            }

            fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self> {
                match op {
                    TernaryOp::BitwiseBlend => Ok((a & !c) | (b & c)),
                    TernaryOp::Fma => Err(Error::unsupported(op, Self::LANE_TYPE)),
                }
            }

            fn compare(op: CompareOp, a: Self, b: Self) -> Result<bool> {
                let signed = a.cmp(&b);
                let unsigned = (a as $u).cmp(&(b as $u));
                Ok(match op {
                    CompareOp::Eq => signed == Ordering::Equal,
                    CompareOp::Ne => signed != Ordering::Equal,
                    CompareOp::Lt => signed == Ordering::Less,
                    CompareOp::Le => signed != Ordering::Greater,
                    CompareOp::Gt => signed == Ordering::Greater,
                    CompareOp::Ge => signed != Ordering::Less,
                    CompareOp::UnsignedLt => unsigned == Ordering::Less,
                    CompareOp::UnsignedLe => unsigned != Ordering::Greater,
                    CompareOp::UnsignedGt => unsigned == Ordering::Greater,
                    CompareOp::UnsignedGe => unsigned != Ordering::Less,
                })
            }

            fn test(op: TestOp, a: Self) -> Result<bool> {
                match op {
                    TestOp::IsDefault => Ok(a == 0),
                    TestOp::IsNegative => Ok(a < 0),
                    TestOp::IsFinite | TestOp::IsNan | TestOp::IsInfinite => {
                        Err(Error::unsupported(op, Self::LANE_TYPE))
                    }
                }
            }
        }
    };
}

impl_int_lane!(i8, u8, LaneType::BYTE);
impl_int_lane!(i16, u16, LaneType::SHORT);
impl_int_lane!(i32, u32, LaneType::INT);
impl_int_lane!(i64, u64, LaneType::LONG);

/// Min with NaN propagation and -0.0 ordered below +0.0.
#[inline(always)]
fn float_min<T: Float>(a: T, b: T) -> T {
    if a.is_nan() {
        a
    } else if b.is_nan() {
        b
    } else if a == b {
        if a.is_sign_negative() { a } else { b }
    } else if a < b {
        a
    } else {
        b
    }
}

/// Max with NaN propagation and +0.0 ordered above -0.0.
#[inline(always)]
fn float_max<T: Float>(a: T, b: T) -> T {
    if a.is_nan() {
        a
    } else if b.is_nan() {
        b
    } else if a == b {
        if a.is_sign_positive() { a } else { b }
    } else if a > b {
        a
    } else {
        b
    }
}

macro_rules! impl_float_lane {
    ($t:ty, $bits:ty, $lane_type:expr, from_f64: $from_f64:expr, to_f64: $to_f64:expr, fma: $fma:expr) => {
        impl Lane for $t {
            const LANE_TYPE: LaneType = $lane_type;

            #[inline(always)]
            fn zero() -> Self {
                <$t as Zero>::zero()
            }

            #[inline(always)]
            fn one() -> Self {
                <$t as One>::one()
            }

            #[inline(always)]
            fn upper_bound() -> Self {
                <$t as Float>::infinity()
            }

            #[inline(always)]
            fn lower_bound() -> Self {
                <$t as Float>::neg_infinity()
            }

            #[inline(always)]
            fn to_bits(self) -> u64 {
                <$t>::to_bits(self) as u64
            }

            #[inline(always)]
            fn from_bits(bits: u64) -> Self {
                <$t>::from_bits(bits as $bits)
            }

            #[inline(always)]
            fn from_i64(value: i64) -> Self {
                $from_f64(value as f64)
            }

            #[inline(always)]
            fn to_index(self) -> i64 {
                $to_f64(self) as i64
            }

            #[inline(always)]
            fn to_f64(self) -> f64 {
                $to_f64(self)
            }

            fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
                $from_f64(rng.random_range(-1024.0f64..1024.0))
            }

            fn corner_case(i: usize) -> Self {
                let cases = [
                    <$t as Float>::max_value(),
                    <$t>::from_bits(1),
                    <$t as Float>::neg_infinity(),
                    <$t as Float>::infinity(),
                    <$t as Float>::nan(),
                    <$t as Zero>::zero(),
                    <$t as Float>::neg_zero(),
                ];
                cases[i % cases.len()]
            }

            #[inline(always)]
            fn same(self, other: Self) -> bool {
                (self.is_nan() && other.is_nan()) || <$t>::to_bits(self) == <$t>::to_bits(other)
            }

            fn unary(op: UnaryOp, a: Self) -> Result<Self> {
                match op {
                    UnaryOp::Neg => Ok(-a),
                    UnaryOp::Abs => Ok(Float::abs(a)),
                    UnaryOp::Sqrt => Ok(Float::sqrt(a)),
                    _ => Err(Error::unsupported(op, Self::LANE_TYPE)),
                }
            }

            fn binary(op: BinaryOp, a: Self, b: Self) -> Result<Self> {
                match op {
                    BinaryOp::Add => Ok(a + b),
                    BinaryOp::Sub => Ok(a - b),
                    BinaryOp::Mul => Ok(a * b),
                    BinaryOp::Div => Ok(a / b),
                    BinaryOp::Min => Ok(float_min(a, b)),
                    BinaryOp::Max => Ok(float_max(a, b)),
                    BinaryOp::FirstNonzero => Ok(if <$t>::to_bits(a) != 0 { a } else { b }),
                    _ => Err(Error::unsupported(op, Self::LANE_TYPE)),
                }
            }

            fn ternary(op: TernaryOp, a: Self, b: Self, c: Self) -> Result<Self> {
                match op {
                    TernaryOp::Fma => Ok($fma(a, b, c)),
                    TernaryOp::BitwiseBlend => Err(Error::unsupported(op, Self::LANE_TYPE)),
                }
            }

            fn compare(op: CompareOp, a: Self, b: Self) -> Result<bool> {
                Ok(match op {
                    CompareOp::Eq => a == b,
                    CompareOp::Ne => a != b,
                    CompareOp::Lt => a < b,
                    CompareOp::Le => a <= b,
                    CompareOp::Gt => a > b,
                    CompareOp::Ge => a >= b,
                    _ => return Err(Error::unsupported(op, Self::LANE_TYPE)),
                })
            }

            fn test(op: TestOp, a: Self) -> Result<bool> {
                Ok(match op {
                    TestOp::IsDefault => <$t>::to_bits(a) == 0,
                    TestOp::IsNegative => a.is_sign_negative(),
                    TestOp::IsFinite => a.is_finite(),
                    TestOp::IsNan => a.is_nan(),
                    TestOp::IsInfinite => a.is_infinite(),
                })
            }
        }
    };
}

// f16 FMA: the product of two halves is exact in f64, so only the final sum is rounded before
// narrowing.
impl_float_lane!(
    f16,
    u16,
    LaneType::HALF,
    from_f64: f16::from_f64,
    to_f64: f16::to_f64,
    fma: |a: f16, b: f16, c: f16| f16::from_f64(a.to_f64().mul_add(b.to_f64(), c.to_f64()))
);
impl_float_lane!(
    f32,
    u32,
    LaneType::FLOAT,
    from_f64: |v: f64| v as f32,
    to_f64: |v: f32| v as f64,
    fma: f32::mul_add
);
impl_float_lane!(
    f64,
    u64,
    LaneType::DOUBLE,
    from_f64: |v: f64| v,
    to_f64: |v: f64| v,
    fma: f64::mul_add
);
