use std::error::Error;
use std::process::Command;

use clap::Args;

use crate::timing::measure;

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Command that compiles the generated source into the benchmark binary.
    #[arg(long, default_value = "make.bat")]
    pub build_cmd: String,
}

/// Runs the build command, returning its combined stdout and stderr.
pub fn run(args: &BuildArgs) -> Result<String, Box<dyn Error>> {
    measure("Building rs-bench", || run_command(&args.build_cmd))
}

pub(crate) fn run_command(command_line: &str) -> Result<String, Box<dyn Error>> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next().ok_or("empty build command")?;
    log::debug!("running {command_line:?}");
    let output = Command::new(program)
        .args(parts)
        .output()
        .map_err(|err| format!("failed to start {program:?}: {err}"))?;
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    if !output.status.success() {
        return Err(format!("{command_line:?} exited with {}:\n{combined}", output.status).into());
    }
    Ok(combined)
}
