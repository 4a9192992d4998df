//! Scoring of struct-recovery output against generated programs.

#![deny(missing_docs)]

mod evaluate;
mod parse;

pub use evaluate::{evaluate, EvaluationReport};
pub use parse::{parse_recovered, stats_lines};

use std::path::Path;

use rsb_core::errors::RsbError;
use rsb_core::model::StrucTable;

/// Reads and parses a recovered header from disk.
pub fn load_recovered(path: &Path) -> Result<StrucTable, RsbError> {
    let text = std::fs::read_to_string(path).map_err(|err| RsbError::io(path, err))?;
    parse_recovered(&text)
}
