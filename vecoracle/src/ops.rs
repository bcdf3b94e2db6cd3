// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Lane-wise opcodes and the lane kinds each of them is defined for.

use std::fmt;

use crate::lane_type::LaneType;

macro_rules! opcodes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal, $supports:ident;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }

            pub const fn supports(self, lane_type: LaneType) -> bool {
                match self {
                    $($name::$variant => $supports(lane_type),)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|op| op.name().eq_ignore_ascii_case(name))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

const fn any(_: LaneType) -> bool {
    true
}

const fn integer(lane_type: LaneType) -> bool {
    lane_type.is_integer()
}

const fn float(lane_type: LaneType) -> bool {
    lane_type.is_float()
}

opcodes! {
    pub enum UnaryOp {
        Neg => "NEG", any;
        Abs => "ABS", any;
        Not => "NOT", integer;
        Sqrt => "SQRT", float;
        Zomo => "ZOMO", integer;
        BitCount => "BIT_COUNT", integer;
        LeadingZerosCount => "LEADING_ZEROS_COUNT", integer;
        TrailingZerosCount => "TRAILING_ZEROS_COUNT", integer;
        Reverse => "REVERSE", integer;
        ReverseBytes => "REVERSE_BYTES", integer;
    }
}

opcodes! {
    /// Two-operand lane-wise operators. Shift and rotate amounts come from the second operand
    /// and are reduced modulo the lane width.
    pub enum BinaryOp {
        Add => "ADD", any;
        Sub => "SUB", any;
        Mul => "MUL", any;
        Div => "DIV", any;
        Min => "MIN", any;
        Max => "MAX", any;
        UMin => "UMIN", integer;
        UMax => "UMAX", integer;
        And => "AND", integer;
        Or => "OR", integer;
        Xor => "XOR", integer;
        AndNot => "AND_NOT", integer;
        FirstNonzero => "FIRST_NONZERO", any;
        SAdd => "SADD", integer;
        SSub => "SSUB", integer;
        SUAdd => "SUADD", integer;
        SUSub => "SUSUB", integer;
        Lshl => "LSHL", integer;
        Lshr => "LSHR", integer;
        Ashr => "ASHR", integer;
        Rol => "ROL", integer;
        Ror => "ROR", integer;
    }
}

impl BinaryOp {
    pub const fn is_shift(self) -> bool {
        matches!(
            self,
            BinaryOp::Lshl | BinaryOp::Lshr | BinaryOp::Ashr | BinaryOp::Rol | BinaryOp::Ror
        )
    }
}

opcodes! {
    pub enum TernaryOp {
        Fma => "FMA", float;
        BitwiseBlend => "BITWISE_BLEND", integer;
    }
}

opcodes! {
    pub enum CompareOp {
        Eq => "EQ", any;
        Ne => "NE", any;
        Lt => "LT", any;
        Le => "LE", any;
        Gt => "GT", any;
        Ge => "GE", any;
        UnsignedLt => "ULT", integer;
        UnsignedLe => "ULE", integer;
        UnsignedGt => "UGT", integer;
        UnsignedGe => "UGE", integer;
    }
}

opcodes! {
    pub enum TestOp {
        IsDefault => "IS_DEFAULT", any;
        IsNegative => "IS_NEGATIVE", any;
        IsFinite => "IS_FINITE", float;
        IsNan => "IS_NAN", float;
        IsInfinite => "IS_INFINITE", float;
    }
}

opcodes! {
    pub enum ReductionOp {
        Add => "ADD", any;
        Mul => "MUL", any;
        Min => "MIN", any;
        Max => "MAX", any;
        UMin => "UMIN", integer;
        UMax => "UMAX", integer;
        And => "AND", integer;
        Or => "OR", integer;
        Xor => "XOR", integer;
        FirstNonzero => "FIRST_NONZERO", any;
        SUAdd => "SUADD", integer;
    }
}

impl ReductionOp {
    /// The lane-wise operator folded over the vector.
    pub const fn step(self) -> BinaryOp {
        match self {
            ReductionOp::Add => BinaryOp::Add,
            ReductionOp::Mul => BinaryOp::Mul,
            ReductionOp::Min => BinaryOp::Min,
            ReductionOp::Max => BinaryOp::Max,
            ReductionOp::UMin => BinaryOp::UMin,
            ReductionOp::UMax => BinaryOp::UMax,
            ReductionOp::And => BinaryOp::And,
            ReductionOp::Or => BinaryOp::Or,
            ReductionOp::Xor => BinaryOp::Xor,
            ReductionOp::FirstNonzero => BinaryOp::FirstNonzero,
            ReductionOp::SUAdd => BinaryOp::SUAdd,
        }
    }
}
