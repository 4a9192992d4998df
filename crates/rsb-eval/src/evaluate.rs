use std::collections::BTreeSet;
use std::fmt::{self, Display};

use rsb_core::errors::{ErrorInfo, RsbError};
use rsb_core::layout::{fingerprint, fingerprints};
use rsb_core::model::StrucTable;
use serde::{Deserialize, Serialize};

/// Score of one recovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Distinct generated layouts.
    pub generated: usize,
    /// Distinct recovered layouts.
    pub recovered: usize,
    /// Generated layouts that were recovered.
    pub matched: usize,
    /// `matched / generated`.
    pub recovered_ratio: f64,
    /// `(generated - matched) / generated`.
    pub garbage_ratio: f64,
}

impl Display for EvaluationReport {
    /// `<recovered_ratio>,<garbage_ratio>`, the harness's stdout line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?},{:?}", self.recovered_ratio, self.garbage_ratio)
    }
}

/// Recovered fingerprints. Structs whose layout cannot be computed (for
/// instance a by-value self embedding) are logged and skipped.
fn recovered_fingerprints(recovered: &StrucTable) -> BTreeSet<String> {
    recovered
        .ids()
        .filter_map(|id| match fingerprint(recovered, id) {
            Ok(fp) => Some(fp),
            Err(err) => {
                log::warn!("skipping recovered struct rs_{id}: {err}");
                None
            }
        })
        .collect()
}

/// Compares generated and recovered structs by layout fingerprint.
pub fn evaluate(generated: &StrucTable, recovered: &StrucTable) -> Result<EvaluationReport, RsbError> {
    let generated_set = fingerprints(generated)?;
    if generated_set.is_empty() {
        return Err(RsbError::Eval(
            ErrorInfo::new("empty-generation", "no generated structs to score against")
                .with_hint("generate with a struct count of at least 1"),
        ));
    }
    let recovered_set = recovered_fingerprints(recovered);
    let matched = generated_set.intersection(&recovered_set).count();
    let total = generated_set.len() as f64;

    let report = EvaluationReport {
        generated: generated_set.len(),
        recovered: recovered_set.len(),
        matched,
        recovered_ratio: matched as f64 / total,
        garbage_ratio: (generated_set.len() - matched) as f64 / total,
    };
    log::info!(
        "matched {} of {} generated layouts ({} recovered)",
        report.matched,
        report.generated,
        report.recovered
    );
    Ok(report)
}
