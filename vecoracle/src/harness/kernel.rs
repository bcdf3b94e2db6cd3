// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    error::{Error, Result},
    eval::{Evaluation, Operation},
    lane::Lane,
    util::floor_mod,
};

/// One run of an operation over flat arrays, processed `length` lanes at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseInput<T: Lane> {
    pub operation: Operation,
    /// Lanes per vector.
    pub length: usize,
    /// One flat array per vector operand, all of the same multiple of `length`.
    pub inputs: Vec<Vec<T>>,
    /// Predicate for each lane of a vector, reused for every window.
    pub mask: Option<Vec<bool>>,
    /// Flat lane indices for rearrangements, windowed like the inputs.
    pub shuffle: Option<Vec<i64>>,
}

impl<T: Lane> CaseInput<T> {
    pub fn total_len(&self) -> usize {
        self.inputs.first().map_or(0, Vec::len)
    }

    pub fn windows(&self) -> usize {
        self.total_len() / self.length
    }
}

/// Flat result of a case: lanes, predicate bits, or one scalar per window.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseOutput<T: Lane> {
    Lanes(Vec<T>),
    Masks(Vec<bool>),
    Scalars(Vec<T>),
}

impl<T: Lane> CaseOutput<T> {
    pub fn empty(operation: &Operation) -> Self {
        match operation {
            Operation::Compare(_) | Operation::Test(_) => CaseOutput::Masks(Vec::new()),
            Operation::Reduce(_) => CaseOutput::Scalars(Vec::new()),
            _ => CaseOutput::Lanes(Vec::new()),
        }
    }

    /// Appends the result of one window.
    pub fn push(&mut self, evaluation: Evaluation<T>) {
        match (self, evaluation) {
            (CaseOutput::Lanes(out), Evaluation::Vector(v)) => out.extend_from_slice(v.lanes()),
            (CaseOutput::Masks(out), Evaluation::Mask(m)) => out.extend_from_slice(m.bits()),
            (CaseOutput::Scalars(out), Evaluation::Scalar(s)) => out.push(s),
            (out, evaluation) => {
                *out = match evaluation {
                    Evaluation::Vector(v) => CaseOutput::Lanes(v.into_lanes()),
                    Evaluation::Mask(m) => CaseOutput::Masks(m.bits().to_vec()),
                    Evaluation::Scalar(s) => CaseOutput::Scalars(vec![s]),
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CaseOutput::Lanes(v) | CaseOutput::Scalars(v) => v.len(),
            CaseOutput::Masks(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The system under test: anything that can run an operation over flat arrays.
pub trait Kernel: Sync {
    fn name(&self) -> &str;

    fn run<T: Lane>(&self, case: &CaseInput<T>) -> Result<CaseOutput<T>>;
}

/// Array-at-a-time scalar loops over the flat inputs. Shares only the per-lane semantics with
/// the evaluator, so it checks the vector plumbing (windowing, masking, movement) end to end.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarKernel;

impl ScalarKernel {
    fn lanes<T: Lane>(
        total: usize,
        n: usize,
        f: impl Fn(usize) -> Result<T>,
    ) -> Result<CaseOutput<T>> {
        let mut out = Vec::with_capacity(total);
        for i in 0..total {
            out.push(f(i).map_err(|e| e.at_lane(i % n))?);
        }
        Ok(CaseOutput::Lanes(out))
    }
}

impl Kernel for ScalarKernel {
    fn name(&self) -> &str {
        "scalar"
    }

    fn run<T: Lane>(&self, case: &CaseInput<T>) -> Result<CaseOutput<T>> {
        let n = case.length;
        let total = case.total_len();
        if case.inputs.len() != case.operation.arity() {
            return Err(Error::Arity {
                expected: case.operation.arity(),
                found: case.inputs.len(),
            });
        }
        let input = |k: usize| case.inputs[k].as_slice();
        let active = |i: usize| case.mask.as_ref().is_none_or(|m| m[i % n]);
        let mask_required = || {
            if case.mask.is_none() {
                return Err(Error::MissingOperand {
                    op: case.operation.to_string(),
                    what: "a mask",
                });
            }
            Ok(())
        };

        match case.operation {
            Operation::Unary(op) => {
                let a = input(0);
                Self::lanes(total, n, |i| {
                    if active(i) { T::unary(op, a[i]) } else { Ok(a[i]) }
                })
            }
            Operation::Binary(op) => {
                let (a, b) = (input(0), input(1));
                Self::lanes(total, n, |i| {
                    if active(i) { T::binary(op, a[i], b[i]) } else { Ok(a[i]) }
                })
            }
            Operation::Ternary(op) => {
                let (a, b, c) = (input(0), input(1), input(2));
                Self::lanes(total, n, |i| {
                    if active(i) {
                        T::ternary(op, a[i], b[i], c[i])
                    } else {
                        Ok(a[i])
                    }
                })
            }
            Operation::ShiftImmediate(op, amount) => {
                let a = input(0);
                let amount = T::from_i64(amount);
                Self::lanes(total, n, |i| {
                    if active(i) { T::binary(op, a[i], amount) } else { Ok(a[i]) }
                })
            }
            Operation::ShiftAccumulate {
                accumulate,
                shift,
                amount,
            } => {
                let (a, b) = (input(0), input(1));
                let amount = T::from_i64(amount);
                Self::lanes(total, n, |i| {
                    if active(i) {
                        T::binary(accumulate, a[i], T::binary(shift, b[i], amount)?)
                    } else {
                        Ok(a[i])
                    }
                })
            }
            Operation::Compare(op) => {
                let (a, b) = (input(0), input(1));
                let bits = (0..total)
                    .map(|i| Ok(active(i) && T::compare(op, a[i], b[i])?))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CaseOutput::Masks(bits))
            }
            Operation::Test(op) => {
                let a = input(0);
                let bits = (0..total)
                    .map(|i| Ok(active(i) && T::test(op, a[i])?))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CaseOutput::Masks(bits))
            }
            Operation::Reduce(op) => {
                let a = input(0);
                let mut out = Vec::with_capacity(case.windows());
                for base in (0..total).step_by(n) {
                    let mut acc = op.identity::<T>();
                    for i in base..base + n {
                        if active(i) {
                            acc = T::binary(op.step(), acc, a[i])?;
                        }
                    }
                    out.push(acc);
                }
                Ok(CaseOutput::Scalars(out))
            }
            Operation::Slice(origin) | Operation::SliceUnary(origin) => {
                if origin > n {
                    return Err(Error::OutOfRange {
                        index: origin as i64,
                        len: n,
                    });
                }
                let a = input(0);
                let b = matches!(case.operation, Operation::Slice(_)).then(|| input(1));
                Self::lanes(total, n, |i| {
                    let (base, lane) = (i - i % n, i % n);
                    Ok(if !active(i) {
                        T::zero()
                    } else if lane + origin < n {
                        a[base + lane + origin]
                    } else {
                        b.map_or(T::zero(), |b| b[base + lane + origin - n])
                    })
                })
            }
            Operation::Unslice { origin, part } => {
                if origin > n {
                    return Err(Error::OutOfRange {
                        index: origin as i64,
                        len: n,
                    });
                }
                if part > 1 {
                    return Err(Error::OutOfRange {
                        index: part as i64,
                        len: 2,
                    });
                }
                let (a, w) = (input(0), input(1));
                let mut out = Vec::with_capacity(total);
                for base in (0..total).step_by(n) {
                    // What the inserted vector looks like after masking: inactive lanes show
                    // the background that sits beneath them.
                    let mut inserted = Vec::with_capacity(n);
                    for lane in 0..n {
                        let underneath = w[base + (lane + origin) % n];
                        inserted.push(if active(base + lane) { a[base + lane] } else { underneath });
                    }
                    for lane in 0..n {
                        out.push(match (part, lane < origin) {
                            (0, true) => w[base + lane],
                            (0, false) => inserted[lane - origin],
                            (_, true) => inserted[n - origin + lane],
                            (_, false) => w[base + lane],
                        });
                    }
                }
                Ok(CaseOutput::Lanes(out))
            }
            Operation::UnsliceUnary(origin) => {
                if origin > n {
                    return Err(Error::OutOfRange {
                        index: origin as i64,
                        len: n,
                    });
                }
                let a = input(0);
                Self::lanes(total, n, |i| {
                    let (base, lane) = (i - i % n, i % n);
                    Ok(if lane < origin {
                        T::zero()
                    } else {
                        a[base + lane - origin]
                    })
                })
            }
            Operation::SelectFrom => {
                let (order, a, b) = (input(0), input(1), input(2));
                Self::lanes(total, n, |i| {
                    let base = i - i % n;
                    let idx = floor_mod(order[i].to_index(), 2 * n as i64) as usize;
                    Ok(if idx < n { a[base + idx] } else { b[base + idx - n] })
                })
            }
            Operation::Rearrange => {
                let a = input(0);
                let shuffle = case.shuffle.as_deref().ok_or_else(|| Error::MissingOperand {
                    op: case.operation.to_string(),
                    what: "a shuffle",
                })?;
                let mut out = Vec::with_capacity(total);
                for i in 0..total {
                    if !active(i) {
                        out.push(T::zero());
                        continue;
                    }
                    let index = shuffle[i];
                    if index < 0 || index >= n as i64 {
                        return Err(Error::OutOfRange { index, len: n });
                    }
                    out.push(a[i - i % n + index as usize]);
                }
                Ok(CaseOutput::Lanes(out))
            }
            Operation::Blend => {
                mask_required()?;
                let (a, b) = (input(0), input(1));
                Self::lanes(total, n, |i| Ok(if active(i) { b[i] } else { a[i] }))
            }
            Operation::Compress => {
                mask_required()?;
                let a = input(0);
                let mut out = vec![T::zero(); total];
                for base in (0..total).step_by(n) {
                    let mut j = base;
                    for i in base..base + n {
                        if active(i) {
                            out[j] = a[i];
                            j += 1;
                        }
                    }
                }
                Ok(CaseOutput::Lanes(out))
            }
            Operation::Expand => {
                mask_required()?;
                let a = input(0);
                let mut out = vec![T::zero(); total];
                for base in (0..total).step_by(n) {
                    let mut k = base;
                    for i in base..base + n {
                        if active(i) {
                            out[i] = a[k];
                            k += 1;
                        }
                    }
                }
                Ok(CaseOutput::Lanes(out))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{BinaryOp, ReductionOp};
    use test_log::test;

    fn case(operation: Operation, inputs: Vec<Vec<i32>>, mask: Option<Vec<bool>>) -> CaseInput<i32> {
        CaseInput {
            operation,
            length: 4,
            inputs,
            mask,
            shuffle: None,
        }
    }

    #[test]
    fn test_masked_binary_windows_reuse_mask() {
        let input = case(
            Operation::Binary(BinaryOp::Mul),
            vec![(1..=8).collect(), vec![10; 8]],
            Some(vec![true, false, false, true]),
        );
        assert_eq!(
            ScalarKernel.run(&input).unwrap(),
            CaseOutput::Lanes(vec![10, 2, 3, 40, 50, 6, 7, 80])
        );
    }

    #[test]
    fn test_division_by_zero_reports_lane_in_window() {
        let input = case(
            Operation::Binary(BinaryOp::Div),
            vec![vec![1; 8], vec![1, 1, 1, 1, 1, 1, 0, 1]],
            None,
        );
        assert_eq!(
            ScalarKernel.run(&input),
            Err(Error::DivisionByZero { lane: 2 })
        );
    }

    #[test]
    fn test_reduce_per_window() {
        let input = case(
            Operation::Reduce(ReductionOp::Add),
            vec![(1..=8).collect()],
            None,
        );
        assert_eq!(
            ScalarKernel.run(&input).unwrap(),
            CaseOutput::Scalars(vec![10, 26])
        );
    }

    #[test]
    fn test_compress_and_expand_per_window() {
        let mask = Some(vec![false, true, true, false]);
        let compress = case(Operation::Compress, vec![(1..=8).collect()], mask.clone());
        assert_eq!(
            ScalarKernel.run(&compress).unwrap(),
            CaseOutput::Lanes(vec![2, 3, 0, 0, 6, 7, 0, 0])
        );
        let expand = case(Operation::Expand, vec![(1..=8).collect()], mask);
        assert_eq!(
            ScalarKernel.run(&expand).unwrap(),
            CaseOutput::Lanes(vec![0, 1, 2, 0, 0, 5, 6, 0])
        );
        let unmasked = case(Operation::Expand, vec![(1..=8).collect()], None);
        assert!(matches!(
            ScalarKernel.run(&unmasked),
            Err(Error::MissingOperand { .. })
        ));
    }

    #[test]
    fn test_unslice_part_error_matches_evaluator() {
        let input = case(
            Operation::Unslice { origin: 1, part: 2 },
            vec![(1..=8).collect(), vec![0; 8]],
            None,
        );
        let expected = Error::OutOfRange { index: 2, len: 2 };
        assert_eq!(ScalarKernel.run(&input), Err(expected.clone()));
        let v = crate::VectorValue::from_lanes(vec![1i32, 2, 3, 4]).unwrap();
        let background = crate::VectorValue::zero(4).unwrap();
        assert_eq!(
            crate::eval::movement::unslice(1, &v, &background, 2, None),
            Err(expected)
        );
        let bad_origin = case(
            Operation::Unslice { origin: 5, part: 2 },
            vec![(1..=8).collect(), vec![0; 8]],
            None,
        );
        assert_eq!(
            ScalarKernel.run(&bad_origin),
            Err(Error::OutOfRange { index: 5, len: 4 })
        );
    }

    #[test]
    fn test_output_push_switches_kind() {
        let mut out = CaseOutput::<i8>::empty(&Operation::Blend);
        out.push(Evaluation::Scalar(3));
        assert_eq!(out, CaseOutput::Scalars(vec![3]));
        assert_eq!(out.len(), 1);
    }
}
