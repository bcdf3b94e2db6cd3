// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use clap::Parser;
use vecoracle::{
    Error, LaneType, Operation, Species,
    harness::HarnessOptions,
};

#[derive(Parser, Debug)]
#[command(
    name = "vecoracle",
    about = "Checks vector kernels against width-parameterized ground truth"
)]
pub struct Opt {
    /// Lane types to check, comma separated: byte, short, int, long, half, float, double.
    /// Unsigned spellings (ubyte, ...) select the signed type of the same width.
    #[clap(long, value_delimiter = ',')]
    pub lane_types: Vec<LaneType>,

    /// Vector widths in bits, comma separated. Defaults to 64,128,256,512.
    #[clap(long, value_delimiter = ',')]
    pub widths: Vec<usize>,

    /// Operations to run, comma separated, e.g. ADD,SADD,LSHL#13,SLICE@1
    #[clap(long, value_delimiter = ',')]
    pub ops: Vec<String>,

    /// Seed for generated inputs
    #[clap(long, default_value_t = 0)]
    pub seed: u64,

    /// Vectors' worth of lanes in each input array
    #[clap(long, default_value_t = 16)]
    pub buffer_reps: usize,

    /// Print the available operations and exit
    #[clap(long)]
    pub list_ops: bool,

    /// Only print failing cases
    #[clap(long, short)]
    pub quiet: bool,
}

impl Opt {
    fn lane_types(&self) -> Vec<LaneType> {
        if self.lane_types.is_empty() {
            LaneType::ELEMENT_TYPES.to_vec()
        } else {
            self.lane_types.clone()
        }
    }

    fn widths(&self) -> Vec<usize> {
        if self.widths.is_empty() {
            Species::STANDARD_BITS.to_vec()
        } else {
            self.widths.clone()
        }
    }

    /// Harness configuration for these flags. Operation names that no selected lane type and
    /// width knows about are rejected.
    pub fn harness_options(&self) -> Result<HarnessOptions, Error> {
        let options = HarnessOptions {
            lane_types: self.lane_types(),
            vector_bits: self.widths(),
            operations: self.ops.clone(),
            buffer_reps: self.buffer_reps,
            seed: self.seed,
            ..Default::default()
        };
        let known = known_operations(&options.lane_types, &options.vector_bits);
        for op in &options.operations {
            let found = known.iter().any(|known| {
                op.eq_ignore_ascii_case(&known.base_name())
                    || op.eq_ignore_ascii_case(&known.to_string())
            });
            if !found {
                return Err(Error::UnknownOperation(op.clone()));
            }
        }
        Ok(options)
    }

    /// One line per operation base name, with the lane types that support it.
    pub fn list_operations(&self) -> Vec<String> {
        let lane_types = self.lane_types();
        let mut names: Vec<String> = Vec::new();
        for op in known_operations(&lane_types, &self.widths()) {
            let name = op.base_name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
            .into_iter()
            .map(|name| {
                let supported: Vec<String> = lane_types
                    .iter()
                    .filter(|lane_type| {
                        Operation::catalog(lane_type.signed_view(), 8)
                            .iter()
                            .any(|op| op.base_name() == name)
                    })
                    .map(|lane_type| lane_type.to_string())
                    .collect();
                format!("{name:<24} {}", supported.join(","))
            })
            .collect()
    }
}

fn known_operations(lane_types: &[LaneType], widths: &[usize]) -> Vec<Operation> {
    let mut known = Vec::new();
    for lane_type in lane_types {
        for &bits in widths {
            if let Ok(species) = Species::new(lane_type.signed_view(), bits) {
                for op in Operation::catalog(species.lane_type(), species.length()) {
                    if !known.contains(&op) {
                        known.push(op);
                    }
                }
            }
        }
    }
    known
}
