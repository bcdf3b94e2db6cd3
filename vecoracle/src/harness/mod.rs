// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The reference harness: runs a [`Kernel`] over generated inputs for every (lane type, vector
//! width, operation) combination and checks its output against the evaluator.

pub mod kernel;
pub mod random;

use std::{fmt, mem::discriminant};

use half::f16;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::{
    error::{Error, Result},
    eval::{Operands, Operation, evaluate},
    lane::Lane,
    lane_type::{LaneKind, LaneType},
    mask::MaskValue,
    ops::ReductionOp,
    species::Species,
    util::tracing_wrappers::*,
    vector::VectorValue,
};

pub use kernel::{CaseInput, CaseOutput, Kernel, ScalarKernel};
pub use random::{InputPattern, MaskPattern, RandomSource};

/// Monomorphizes `$body` for the element type matching `$lane_type`, bound to `$t`. Unsigned
/// views run on the signed type of the same width.
macro_rules! with_lane_type {
    ($lane_type:expr, $t:ident => $body:expr) => {{
        let lane_type: LaneType = $lane_type;
        match (lane_type.kind(), lane_type.bit_width()) {
            (LaneKind::Float, 16) => {
                type $t = f16;
                $body
            }
            (LaneKind::Float, 32) => {
                type $t = f32;
                $body
            }
            (LaneKind::Float, _) => {
                type $t = f64;
                $body
            }
            (_, 8) => {
                type $t = i8;
                $body
            }
            (_, 16) => {
                type $t = i16;
                $body
            }
            (_, 32) => {
                type $t = i32;
                $body
            }
            (_, _) => {
                type $t = i64;
                $body
            }
        }
    }};
}

#[derive(Clone, Debug)]
pub struct HarnessOptions {
    /// Element types to cover. Unsigned views are folded into the signed type of the same width.
    pub lane_types: Vec<LaneType>,
    /// Vector widths in bits.
    pub vector_bits: Vec<usize>,
    /// Operation names to run, matched case-insensitively against either the full name
    /// (`LSHL#13`) or the base name (`LSHL`). Empty runs everything.
    pub operations: Vec<String>,
    /// Number of vectors' worth of lanes in each input array.
    pub buffer_reps: usize,
    pub seed: u64,
    pub input_patterns: Vec<InputPattern>,
    /// Masks tried for every operation that takes one.
    pub mask_patterns: Vec<MaskPattern>,
    /// Allowed error of float ADD reductions, in units in the last place of the expected value.
    pub add_reduction_ulps: u32,
    /// Same for MUL reductions.
    pub mul_reduction_ulps: u32,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            lane_types: LaneType::ELEMENT_TYPES.to_vec(),
            vector_bits: Species::STANDARD_BITS.to_vec(),
            operations: Vec::new(),
            buffer_reps: 16,
            seed: 0,
            input_patterns: InputPattern::ALL.to_vec(),
            mask_patterns: MaskPattern::ALL.to_vec(),
            add_reduction_ulps: 10,
            mul_reduction_ulps: 50,
        }
    }
}

/// One (lane type, width, operation, masked) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Case {
    pub species: Species,
    pub operation: Operation,
    pub masked: bool,
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-bit {}",
            self.species.lane_type(),
            self.species.vector_bits(),
            self.operation
        )?;
        if self.masked {
            f.write_str(" masked")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub input_pattern: InputPattern,
    pub mask_pattern: Option<MaskPattern>,
    /// Flat output index of the first differing element, if both sides produced output.
    pub index: Option<usize>,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inputs {}", self.input_pattern)?;
        if let Some(mask) = self.mask_pattern {
            write!(f, ", mask {mask}")?;
        }
        if let Some(index) = self.index {
            write!(f, ", at index #{index}")?;
        }
        write!(f, ": expected {}, actual {}", self.expected, self.actual)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Passed { checks: usize },
    Failed(Mismatch),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseReport {
    pub case: Case,
    pub outcome: Outcome,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed { .. })
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Passed { checks } => write!(f, "PASS {} ({checks} checks)", self.case),
            Outcome::Failed(mismatch) => write!(f, "FAIL {}: {mismatch}", self.case),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Report {
    pub kernel: String,
    pub cases: Vec<CaseReport>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }
}

/// Runs `input` through the evaluator one window at a time.
pub fn oracle<T: Lane>(input: &CaseInput<T>) -> Result<CaseOutput<T>> {
    let n = input.length;
    let mask = input
        .mask
        .as_ref()
        .map(|bits| MaskValue::from_bools(bits.clone()))
        .transpose()?;
    let mut output = CaseOutput::empty(&input.operation);
    for base in (0..input.total_len()).step_by(n) {
        let vectors = input
            .inputs
            .iter()
            .map(|array| VectorValue::from_array(array, base, n))
            .collect::<Result<Vec<_>>>()?;
        let mut operands = Operands::new(&vectors);
        if let Some(mask) = &mask {
            operands = operands.with_mask(mask);
        }
        if let Some(shuffle) = &input.shuffle {
            let window = shuffle.get(base..base + n).ok_or(Error::WindowOutOfRange {
                offset: base,
                length: n,
                len: shuffle.len(),
            })?;
            operands = operands.with_shuffle(window);
        }
        output.push(evaluate(&input.operation, &operands)?);
    }
    Ok(output)
}

/// Whether `actual` is within `ulps` units in the last place of `expected`.
fn within_ulps<T: Lane>(expected: T, actual: T, ulps: u32) -> bool {
    if expected.same(actual) {
        return true;
    }
    let (e, a) = (expected.to_f64(), actual.to_f64());
    if !e.is_finite() || !a.is_finite() {
        return false;
    }
    let sign = 1u64 << (T::LANE_TYPE.bit_width() - 1);
    let magnitude = expected.to_bits() & !sign;
    let above = T::from_bits(magnitude + 1).to_f64();
    // The largest finite value has no finite neighbour above it.
    let ulp = if above.is_finite() {
        above - e.abs()
    } else {
        e.abs() - T::from_bits(magnitude - 1).to_f64()
    };
    (e - a).abs() <= ulp * ulps as f64
}

pub struct Harness {
    options: HarnessOptions,
}

impl Harness {
    pub fn new(options: HarnessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    fn selects(&self, operation: &Operation) -> bool {
        let ops = &self.options.operations;
        if ops.is_empty() {
            return true;
        }
        let (base, full) = (operation.base_name(), operation.to_string());
        ops.iter()
            .any(|op| op.eq_ignore_ascii_case(&base) || op.eq_ignore_ascii_case(&full))
    }

    /// Every case the options select, in a stable order.
    pub fn cases(&self) -> Vec<Case> {
        let mut lane_types: Vec<LaneType> = Vec::new();
        for lane_type in &self.options.lane_types {
            let lane_type = lane_type.signed_view();
            if !lane_types.contains(&lane_type) {
                lane_types.push(lane_type);
            }
        }
        let mut cases = Vec::new();
        for lane_type in lane_types {
            for &bits in &self.options.vector_bits {
                let Ok(species) = Species::new(lane_type, bits) else {
                    warn!(%lane_type, bits, "skipping invalid species");
                    continue;
                };
                for operation in Operation::catalog(lane_type, species.length()) {
                    if !self.selects(&operation) {
                        continue;
                    }
                    let variants: &[bool] = if operation.requires_mask() {
                        &[true]
                    } else if operation.accepts_mask() {
                        &[false, true]
                    } else {
                        &[false]
                    };
                    cases.extend(variants.iter().map(|&masked| Case {
                        species,
                        operation,
                        masked,
                    }));
                }
            }
        }
        cases
    }

    /// Runs every selected case against `kernel`, in parallel when the `parallel` feature is on.
    pub fn run<K: Kernel>(&self, kernel: &K) -> Report {
        let cases = self.cases();
        info!(kernel = kernel.name(), cases = cases.len(), "running harness");

        #[cfg(feature = "parallel")]
        let reports = {
            use rayon::prelude::*;
            cases
                .par_iter()
                .enumerate()
                .map(|(index, case)| self.run_case(kernel, case, index))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let reports = cases
            .iter()
            .enumerate()
            .map(|(index, case)| self.run_case(kernel, case, index))
            .collect();

        Report {
            kernel: kernel.name().to_string(),
            cases: reports,
        }
    }

    /// Runs one case with its own generator, seeded from the harness seed and `index`.
    pub fn run_case<K: Kernel>(&self, kernel: &K, case: &Case, index: usize) -> CaseReport {
        let seed = self.options.seed ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = XorShiftRng::seed_from_u64(seed);
        debug!(%case, seed, "running case");
        let outcome = with_lane_type!(case.species.lane_type(), T => {
            self.check::<T, K>(kernel, case, &mut rng)
        });
        if let Outcome::Failed(mismatch) = &outcome {
            warn!(%case, %mismatch, "mismatch");
        }
        CaseReport {
            case: *case,
            outcome,
        }
    }

    fn check<T: Lane, K: Kernel>(
        &self,
        kernel: &K,
        case: &Case,
        rng: &mut impl RandomSource,
    ) -> Outcome {
        let length = case.species.length();
        let total = length * self.options.buffer_reps.max(1);
        let operation = case.operation;
        let patterns = &self.options.input_patterns;
        let mask_variants: Vec<Option<MaskPattern>> = if case.masked {
            self.options.mask_patterns.iter().copied().map(Some).collect()
        } else {
            vec![None]
        };

        let mut checks = 0;
        for (p, &input_pattern) in patterns.iter().enumerate() {
            for &mask_pattern in &mask_variants {
                let mut inputs: Vec<Vec<T>> = (0..operation.arity())
                    .map(|k| patterns[(p + k) % patterns.len()].generate(total, rng))
                    .collect();
                if operation.may_divide_by_zero(T::LANE_TYPE) {
                    for x in inputs[1].iter_mut().filter(|x| x.same(T::zero())) {
                        *x = T::one();
                    }
                }
                let input = CaseInput {
                    operation,
                    length,
                    inputs,
                    mask: mask_pattern.map(|m| m.generate(length, rng)),
                    shuffle: operation
                        .requires_shuffle()
                        .then(|| random::shuffle_indices(total, length, rng)),
                };
                let expected = oracle(&input);
                let actual = kernel.run(&input);
                trace!(?expected, ?actual);
                if let Some((index, expected, actual)) =
                    self.difference(&operation, &expected, &actual)
                {
                    return Outcome::Failed(Mismatch {
                        input_pattern,
                        mask_pattern,
                        index,
                        expected,
                        actual,
                    });
                }
                checks += 1;
            }
        }
        Outcome::Passed { checks }
    }

    fn reduction_ulps(&self, operation: &Operation) -> Option<u32> {
        match operation {
            Operation::Reduce(ReductionOp::Add) => Some(self.options.add_reduction_ulps),
            Operation::Reduce(ReductionOp::Mul) => Some(self.options.mul_reduction_ulps),
            _ => None,
        }
    }

    /// First difference between the evaluator's and the kernel's result. Two errors of the
    /// same kind agree.
    fn difference<T: Lane>(
        &self,
        operation: &Operation,
        expected: &Result<CaseOutput<T>>,
        actual: &Result<CaseOutput<T>>,
    ) -> Option<(Option<usize>, String, String)> {
        let (expected, actual) = match (expected, actual) {
            (Ok(e), Ok(a)) => (e, a),
            (Err(e), Err(a)) if discriminant(e) == discriminant(a) => return None,
            (e, a) => return Some((None, format!("{e:?}"), format!("{a:?}"))),
        };
        if expected.len() != actual.len() {
            return Some((
                None,
                format!("{} elements", expected.len()),
                format!("{} elements", actual.len()),
            ));
        }
        let ulps = self
            .reduction_ulps(operation)
            .filter(|_| T::LANE_TYPE.is_float());
        match (expected, actual) {
            (CaseOutput::Lanes(e), CaseOutput::Lanes(a)) => e
                .iter()
                .zip(a)
                .position(|(x, y)| !x.same(*y))
                .map(|i| (Some(i), format!("{:?}", e[i]), format!("{:?}", a[i]))),
            (CaseOutput::Scalars(e), CaseOutput::Scalars(a)) => e
                .iter()
                .zip(a)
                .position(|(x, y)| match ulps {
                    Some(ulps) => !within_ulps(*x, *y, ulps),
                    None => !x.same(*y),
                })
                .map(|i| (Some(i), format!("{:?}", e[i]), format!("{:?}", a[i]))),
            (CaseOutput::Masks(e), CaseOutput::Masks(a)) => e
                .iter()
                .zip(a)
                .position(|(x, y)| x != y)
                .map(|i| (Some(i), e[i].to_string(), a[i].to_string())),
            (e, a) => Some((None, format!("{e:?}"), format!("{a:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::BinaryOp;
    use test_log::test;

    fn small_options() -> HarnessOptions {
        HarnessOptions {
            lane_types: vec![LaneType::BYTE, LaneType::FLOAT],
            vector_bits: vec![64],
            buffer_reps: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_case_selection() {
        let harness = Harness::new(HarnessOptions {
            operations: vec!["sadd".to_string(), "LSHL#13".to_string()],
            ..small_options()
        });
        let cases = harness.cases();
        let names: Vec<String> = cases.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            [
                "byte 64-bit SADD",
                "byte 64-bit SADD masked",
                "byte 64-bit LSHL#13",
                "byte 64-bit LSHL#13 masked",
            ]
        );
    }

    #[test]
    fn test_unsigned_views_fold_into_signed() {
        let harness = Harness::new(HarnessOptions {
            lane_types: vec![LaneType::UINT, LaneType::INT],
            vector_bits: vec![128, 48],
            operations: vec!["UMAX".to_string()],
            ..Default::default()
        });
        let cases = harness.cases();
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|c| c.species.lane_type() == LaneType::INT));
    }

    #[test]
    fn test_scalar_kernel_passes() {
        let report = Harness::new(small_options()).run(&ScalarKernel);
        let failures: Vec<String> = report.failures().map(|c| c.to_string()).collect();
        assert!(failures.is_empty(), "{failures:#?}");
        assert!(report.passed() > 100);
    }

    struct OffByOne;

    impl Kernel for OffByOne {
        fn name(&self) -> &str {
            "off-by-one"
        }

        fn run<T: Lane>(&self, case: &CaseInput<T>) -> Result<CaseOutput<T>> {
            let mut output = ScalarKernel.run(case)?;
            if let CaseOutput::Lanes(lanes) = &mut output {
                if let Some(last) = lanes.last_mut() {
                    *last = T::binary(BinaryOp::Add, *last, T::one())?;
                }
            }
            Ok(output)
        }
    }

    #[test]
    fn test_mismatch_is_reported() {
        let harness = Harness::new(HarnessOptions {
            lane_types: vec![LaneType::INT],
            operations: vec!["ADD".to_string()],
            ..small_options()
        });
        let report = harness.run(&OffByOne);
        assert_eq!(report.kernel, "off-by-one");
        assert!(!report.is_success());
        let failure = report.failures().next().unwrap();
        let Outcome::Failed(mismatch) = &failure.outcome else {
            unreachable!()
        };
        assert_eq!(mismatch.index, Some(3));
        assert_eq!(mismatch.input_pattern, InputPattern::NegScaled);
    }

    #[test]
    fn test_ulp_tolerance() {
        assert!(within_ulps(1.0f32, 1.0 + f32::EPSILON, 1));
        assert!(!within_ulps(1.0f32, 1.0 + 4.0 * f32::EPSILON, 2));
        assert!(within_ulps(f64::NAN, f64::NAN, 0));
        assert!(!within_ulps(f16::INFINITY, f16::MAX, 10));
    }

    #[test]
    fn test_ulp_tolerance_at_largest_finite() {
        assert!(!within_ulps(f32::MAX, 0.0f32, 10));
        assert!(!within_ulps(-f64::MAX, 1.0f64, 50));
        assert!(!within_ulps(f16::MAX, f16::ZERO, 10));
        let below = f32::from_bits(f32::MAX.to_bits() - 3);
        assert!(within_ulps(f32::MAX, below, 10));
        assert!(!within_ulps(f32::MAX, below, 2));
        assert!(within_ulps(f16::MAX, f16::from_bits(f16::MAX.to_bits() - 1), 1));
    }
}
