// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::{fmt, str::FromStr};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LaneKind {
    SignedInt,
    UnsignedInt,
    Float,
}

/// Describes one scalar element kind: its width and how its bits are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LaneType {
    kind: LaneKind,
    bit_width: u32,
}

impl LaneType {
    pub const BYTE: LaneType = LaneType::new(LaneKind::SignedInt, 8);
    pub const SHORT: LaneType = LaneType::new(LaneKind::SignedInt, 16);
    pub const INT: LaneType = LaneType::new(LaneKind::SignedInt, 32);
    pub const LONG: LaneType = LaneType::new(LaneKind::SignedInt, 64);

    pub const UBYTE: LaneType = LaneType::new(LaneKind::UnsignedInt, 8);
    pub const USHORT: LaneType = LaneType::new(LaneKind::UnsignedInt, 16);
    pub const UINT: LaneType = LaneType::new(LaneKind::UnsignedInt, 32);
    pub const ULONG: LaneType = LaneType::new(LaneKind::UnsignedInt, 64);

    pub const HALF: LaneType = LaneType::new(LaneKind::Float, 16);
    pub const FLOAT: LaneType = LaneType::new(LaneKind::Float, 32);
    pub const DOUBLE: LaneType = LaneType::new(LaneKind::Float, 64);

    /// Element types a vector can be made of. Unsigned views only exist for operators.
    pub const ELEMENT_TYPES: [LaneType; 7] = [
        Self::BYTE,
        Self::SHORT,
        Self::INT,
        Self::LONG,
        Self::HALF,
        Self::FLOAT,
        Self::DOUBLE,
    ];

    const fn new(kind: LaneKind, bit_width: u32) -> Self {
        Self { kind, bit_width }
    }

    pub const fn kind(self) -> LaneKind {
        self.kind
    }

    pub const fn bit_width(self) -> u32 {
        self.bit_width
    }

    pub const fn is_integer(self) -> bool {
        !self.is_float()
    }

    pub const fn is_float(self) -> bool {
        matches!(self.kind, LaneKind::Float)
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(self.kind, LaneKind::UnsignedInt)
    }

    /// Smallest value of a two's-complement integer of this width.
    pub const fn signed_min(self) -> i64 {
        i64::MIN >> (64 - self.bit_width)
    }

    /// Largest value of a two's-complement integer of this width.
    pub const fn signed_max(self) -> i64 {
        i64::MAX >> (64 - self.bit_width)
    }

    /// Largest value of an unsigned integer of this width (all bits set).
    pub const fn unsigned_max(self) -> u64 {
        u64::MAX >> (64 - self.bit_width)
    }

    pub const fn unsigned_view(self) -> Self {
        match self.kind {
            LaneKind::SignedInt => Self::new(LaneKind::UnsignedInt, self.bit_width),
            _ => self,
        }
    }

    pub const fn signed_view(self) -> Self {
        match self.kind {
            LaneKind::UnsignedInt => Self::new(LaneKind::SignedInt, self.bit_width),
            _ => self,
        }
    }

    pub const fn name(self) -> &'static str {
        match (self.kind, self.bit_width) {
            (LaneKind::SignedInt, 8) => "byte",
            (LaneKind::SignedInt, 16) => "short",
            (LaneKind::SignedInt, 32) => "int",
            (LaneKind::SignedInt, _) => "long",
            (LaneKind::UnsignedInt, 8) => "ubyte",
            (LaneKind::UnsignedInt, 16) => "ushort",
            (LaneKind::UnsignedInt, 32) => "uint",
            (LaneKind::UnsignedInt, _) => "ulong",
            (LaneKind::Float, 16) => "half",
            (LaneKind::Float, 32) => "float",
            (LaneKind::Float, _) => "double",
        }
    }
}

impl fmt::Display for LaneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaneType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = Self::ELEMENT_TYPES
            .into_iter()
            .chain([Self::UBYTE, Self::USHORT, Self::UINT, Self::ULONG]);
        for lane_type in all {
            if lane_type.name().eq_ignore_ascii_case(s.trim()) {
                return Ok(lane_type);
            }
        }
        Err(Error::UnknownLaneType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_integer_bounds() {
        assert_eq!(LaneType::BYTE.signed_min(), -128);
        assert_eq!(LaneType::BYTE.signed_max(), 127);
        assert_eq!(LaneType::BYTE.unsigned_max(), 255);
        assert_eq!(LaneType::SHORT.signed_min(), i16::MIN as i64);
        assert_eq!(LaneType::INT.signed_max(), i32::MAX as i64);
        assert_eq!(LaneType::LONG.signed_min(), i64::MIN);
        assert_eq!(LaneType::LONG.unsigned_max(), u64::MAX);
    }

    #[test]
    fn test_views() {
        assert_eq!(LaneType::INT.unsigned_view(), LaneType::UINT);
        assert_eq!(LaneType::UINT.signed_view(), LaneType::INT);
        assert_eq!(LaneType::FLOAT.unsigned_view(), LaneType::FLOAT);
        assert!(LaneType::UBYTE.is_unsigned());
        assert!(LaneType::UBYTE.is_integer());
        assert!(LaneType::HALF.is_float());
        assert_eq!(LaneType::HALF.bit_width(), 16);
    }

    #[test]
    fn test_parse_round_trip() {
        for lane_type in LaneType::ELEMENT_TYPES {
            assert_eq!(lane_type.name().parse::<LaneType>().unwrap(), lane_type);
        }
        assert_eq!("ULong".parse::<LaneType>().unwrap(), LaneType::ULONG);
        assert!(matches!(
            "quad".parse::<LaneType>(),
            Err(Error::UnknownLaneType(_))
        ));
    }
}
