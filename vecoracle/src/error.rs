// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

use crate::lane_type::LaneType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Index {index} out of range for length {len}")]
    OutOfRange { index: i64, len: usize },
    #[error("Window of {length} lanes at offset {offset} exceeds array of length {len}")]
    WindowOutOfRange {
        offset: usize,
        length: usize,
        len: usize,
    },
    #[error("Integer division by zero in lane {lane}")]
    DivisionByZero { lane: usize },
    #[error("Shape mismatch: expected {expected} lanes, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("Operation expects {expected} vector operands, got {found}")]
    Arity { expected: usize, found: usize },
    #[error("Operation {op} requires {what}")]
    MissingOperand { op: String, what: &'static str },
    #[error("{op} is not defined for {lane_type} lanes")]
    Unsupported { op: String, lane_type: LaneType },
    #[error("Invalid vector length: {0}")]
    InvalidLength(usize),
    #[error("Invalid species: {bits}-bit vectors of {lane_type} lanes")]
    InvalidSpecies { lane_type: LaneType, bits: usize },
    #[error("Cannot cast a {from}-lane mask to {to} lanes")]
    IncompatibleMaskCast { from: usize, to: usize },
    #[error("Unknown lane type: {0}")]
    UnknownLaneType(String),
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

impl Error {
    pub(crate) fn unsupported(op: impl ToString, lane_type: LaneType) -> Self {
        Error::Unsupported {
            op: op.to_string(),
            lane_type,
        }
    }

    /// Scalar lane semantics cannot know which lane they run in; the evaluator patches it in.
    pub(crate) fn at_lane(self, lane: usize) -> Self {
        match self {
            Error::DivisionByZero { .. } => Error::DivisionByZero { lane },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
