use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rsb_eval::EvaluationReport;

use super::build::{self, BuildArgs};
use super::evaluate;
use super::generate::{self, GenerateArgs};
use super::recover::{self, RecoverArgs};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,
    #[command(flatten)]
    pub build: BuildArgs,
    #[command(flatten)]
    pub recover: RecoverArgs,
    /// Also write the full report as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Generate, build, recover and evaluate in sequence.
pub fn run(args: &RunArgs) -> Result<EvaluationReport, Box<dyn Error>> {
    let program = generate::run(&args.generate)?;
    let build_log = build::run(&args.build)?;
    log::debug!("build output:\n{build_log}");
    recover::run(&args.recover)?;
    let report = evaluate::score(&program, &args.recover.recover)?;
    if let Some(path) = &args.report {
        evaluate::write_report(path, &report)?;
    }
    Ok(report)
}
