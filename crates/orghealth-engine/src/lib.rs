#![forbid(unsafe_code)]
//! orghealth-engine library.
//!
//! # Pipeline
//!
//! ```text
//! CompanySnapshot (subdivisions + links)
//!        ↓  metrics::compute_metrics()
//! MetricMaps (centrality, delay, index per subdivision id)
//!        ↓  diagnostics::diagnose()
//! Diagnosis (ascending-index entries + worst performer)
//!        ↓  report::render_text()   (optional)
//! text
//! ```
//!
//! # Conventions
//!
//! - **Errors**: The only fatal condition is
//!   [`AnalysisError::InsufficientSubdivisions`]; everything else is absorbed
//!   into the output.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod diagnostics;
pub mod metrics;
pub mod report;

use orghealth_core::config::AnalysisConfig;
use orghealth_core::error::AnalysisError;
use orghealth_core::model::CompanySnapshot;
use tracing::instrument;

pub use diagnostics::{Diagnosis, Finding, SubdivisionDiagnosis, WorstPerformer, diagnose};
pub use metrics::{MetricMaps, compute_metrics};
pub use report::{render_report, render_text};

/// Result of one analysis pass.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The company has no subdivisions; nothing was computed.
    NoData,
    /// Metrics were computed and diagnosed.
    Report(Diagnosis),
}

/// Run compute → diagnose over one company snapshot.
///
/// An empty snapshot short-circuits to [`AnalysisOutcome::NoData`] before
/// the engine is invoked.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientSubdivisions`] when the snapshot has
/// exactly one subdivision.
#[instrument(skip_all, fields(subdivisions = snapshot.subdivisions.len(), links = snapshot.links.len()))]
pub fn analyze(
    snapshot: &CompanySnapshot,
    config: &AnalysisConfig,
) -> Result<AnalysisOutcome, AnalysisError> {
    if snapshot.is_empty() {
        tracing::info!("no subdivisions loaded, skipping analysis");
        return Ok(AnalysisOutcome::NoData);
    }

    let maps = compute_metrics(
        &snapshot.subdivisions,
        &snapshot.links,
        &config.coefficients,
    )?;

    Ok(diagnose(
        &snapshot.subdivisions,
        &snapshot.links,
        &maps,
        &config.thresholds,
    )
    .map_or(AnalysisOutcome::NoData, AnalysisOutcome::Report))
}
