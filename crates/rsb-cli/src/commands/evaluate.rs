use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use rsb_eval::{evaluate, load_recovered, EvaluationReport};
use rsb_gen::{manifest_path, Program};

use crate::timing::measure;

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// restruc output to score.
    #[arg(short = 'R', long = "recover", default_value = "recovered.hxx")]
    pub recover: PathBuf,
    /// Generated C++ file whose manifest (`<output>.json`) is scored against.
    #[arg(short = 'o', long, default_value = "test.cxx")]
    pub output: PathBuf,
    /// Explicit manifest path, overriding the one derived from `--output`.
    #[arg(long)]
    pub generated: Option<PathBuf>,
    /// Also write the full report as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl EvaluateArgs {
    fn manifest(&self) -> PathBuf {
        self.generated
            .clone()
            .unwrap_or_else(|| manifest_path(&self.output))
    }
}

pub fn run(args: &EvaluateArgs) -> Result<EvaluationReport, Box<dyn Error>> {
    let program = Program::load(&args.manifest())?;
    let report = score(&program, &args.recover)?;
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    Ok(report)
}

/// Scores `program` against the recovered header at `recovered`.
pub fn score(program: &Program, recovered: &Path) -> Result<EvaluationReport, Box<dyn Error>> {
    measure("Evaluating", || -> Result<EvaluationReport, Box<dyn Error>> {
        let recovered = load_recovered(recovered)?;
        Ok(evaluate(&program.strucs, &recovered)?)
    })
}

pub fn write_report(path: &Path, report: &EvaluationReport) -> Result<(), Box<dyn Error>> {
    fs::write(path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}
