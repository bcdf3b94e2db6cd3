// Copyright (c) the vecoracle Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use vecoracle::harness::{Harness, ScalarKernel};
use vecoracle_cli::Opt;

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    if opt.list_ops {
        for line in opt.list_operations() {
            println!("{line}");
        }
        return Ok(());
    }

    let options = opt
        .harness_options()
        .wrap_err("Invalid harness configuration")?;
    let report = Harness::new(options).run(&ScalarKernel);

    for case in &report.cases {
        if !opt.quiet || !case.passed() {
            println!("{case}");
        }
    }
    println!(
        "{} cases against the {} kernel: {} passed, {} failed",
        report.cases.len(),
        report.kernel,
        report.passed(),
        report.failed()
    );

    if !report.is_success() {
        return Err(eyre!("{} case(s) failed", report.failed()));
    }
    Ok(())
}
