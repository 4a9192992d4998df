use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use clap::Args;
use rsb_eval::stats_lines;

use crate::timing::measure;

#[derive(Args, Debug, Clone)]
pub struct RecoverArgs {
    /// Path to the restruc executable.
    #[arg(short = 'r', long, default_value = "restruc.exe")]
    pub restruc: PathBuf,
    /// File receiving restruc's output.
    #[arg(short = 'R', long = "recover", default_value = "recovered.hxx")]
    pub recover: PathBuf,
    /// Binary built from the generated source.
    #[arg(long, default_value = "build/Release/rs-bench.exe")]
    pub target: PathBuf,
}

/// Runs restruc on the target binary and stores its output.
pub fn run(args: &RecoverArgs) -> Result<String, Box<dyn Error>> {
    measure("Recovering structs", || -> Result<String, Box<dyn Error>> {
        let output = Command::new(&args.restruc)
            .arg(&args.target)
            .output()
            .map_err(|err| format!("failed to start {}: {err}", args.restruc.display()))?;
        let mut recovered = String::from_utf8_lossy(&output.stdout).into_owned();
        recovered.push_str(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            return Err(format!(
                "{} exited with {}:\n{recovered}",
                args.restruc.display(),
                output.status
            )
            .into());
        }
        fs::write(&args.recover, &recovered)?;
        for line in stats_lines(&recovered) {
            log::debug!("> {line}");
        }
        Ok(recovered)
    })
}
