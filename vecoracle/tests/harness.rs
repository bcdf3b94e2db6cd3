// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use test_log::test;
use vecoracle::{
    Lane, LaneType, Result,
    harness::{CaseInput, CaseOutput, Harness, HarnessOptions, Kernel, Outcome, ScalarKernel},
};

/// Runs the scalar kernel with every mask dropped.
struct MaskBlind;

impl Kernel for MaskBlind {
    fn name(&self) -> &str {
        "mask-blind"
    }

    fn run<T: Lane>(&self, case: &CaseInput<T>) -> Result<CaseOutput<T>> {
        ScalarKernel.run(&CaseInput {
            mask: None,
            ..case.clone()
        })
    }
}

#[test]
fn scalar_kernel_agrees_everywhere() {
    let harness = Harness::new(HarnessOptions {
        buffer_reps: 2,
        seed: 0x5EED,
        ..Default::default()
    });
    let report = harness.run(&ScalarKernel);
    let failures: Vec<String> = report.failures().map(|c| c.to_string()).collect();
    assert!(failures.is_empty(), "{failures:#?}");
    assert_eq!(report.cases.len(), harness.cases().len());
}

#[test]
fn runs_are_reproducible() {
    let options = HarnessOptions {
        lane_types: vec![LaneType::HALF, LaneType::LONG],
        vector_bits: vec![128],
        buffer_reps: 3,
        seed: 42,
        ..Default::default()
    };
    let first = Harness::new(options.clone()).run(&ScalarKernel);
    let second = Harness::new(options).run(&ScalarKernel);
    assert_eq!(first.cases, second.cases);
}

#[test]
fn ignoring_masks_is_caught() {
    let harness = Harness::new(HarnessOptions {
        lane_types: vec![LaneType::SHORT],
        vector_bits: vec![128],
        operations: vec!["ADD".to_string(), "COMPRESS".to_string()],
        buffer_reps: 2,
        ..Default::default()
    });
    let report = harness.run(&MaskBlind);
    for case in &report.cases {
        assert_eq!(case.passed(), !case.case.masked, "{case}");
    }
    let failure = report.failures().next().unwrap();
    let Outcome::Failed(mismatch) = &failure.outcome else {
        unreachable!()
    };
    assert!(mismatch.mask_pattern.is_some());
}
