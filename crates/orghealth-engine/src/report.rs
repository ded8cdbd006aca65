//! Plain-text rendering of a [`Diagnosis`].
//!
//! A thin formatter over the structured findings; nothing here decides
//! what is flagged.

use std::fmt;
use std::io::{self, Write};

use orghealth_core::config::AnalysisConfig;
use orghealth_core::model::{Link, Subdivision};

use crate::diagnostics::{Diagnosis, NORMAL_RANGE_MESSAGE, SubdivisionDiagnosis, diagnose};
use crate::metrics::MetricMaps;

const RULE_WIDTH: usize = 60;

/// [`Display`](fmt::Display) adapter producing the human-readable report.
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a>(pub &'a Diagnosis);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diagnosis = self.0;
        writeln!(f, "{:=^width$}", " ANALYSIS RESULTS ", width = RULE_WIDTH)?;
        writeln!(f)?;

        for entry in &diagnosis.entries {
            write_entry(entry, f)?;
            writeln!(f)?;
        }

        writeln!(f, "Subdivision with the lowest integral index:")?;
        writeln!(
            f,
            "  {} (ID={}, I = {:.2})",
            diagnosis.worst.name, diagnosis.worst.id, diagnosis.worst.index
        )?;
        writeln!(f, "{:=<width$}", "", width = RULE_WIDTH)
    }
}

fn write_entry(entry: &SubdivisionDiagnosis, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Subdivision: {} (ID={})", entry.name, entry.id)?;
    writeln!(f, "  Centrality C_i       = {:.2}", entry.centrality)?;
    writeln!(f, "  Total delay D_i      = {:.2}", entry.delay)?;
    writeln!(f, "  KPI                  = {:.2}", entry.kpi)?;
    writeln!(f, "  State S_i            = {:.2}", entry.state)?;
    writeln!(f, "  Integral index I_i   = {:.2}", entry.index)?;

    if entry.is_normal() {
        return writeln!(f, "  {NORMAL_RANGE_MESSAGE}.");
    }

    writeln!(f, "  Detected issues:")?;
    for finding in &entry.findings {
        writeln!(f, "    - {finding}")?;
    }
    writeln!(f, "  Suggested measures:")?;
    for suggestion in &entry.suggestions {
        writeln!(f, "    * {suggestion};")?;
    }
    Ok(())
}

/// Write the full human-readable report.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render_text(diagnosis: &Diagnosis, w: &mut dyn Write) -> io::Result<()> {
    write!(w, "{}", TextReport(diagnosis))
}

/// Diagnose and render in one call.
///
/// Returns `None` for an empty subdivision set, and only then. Prefer
/// [`diagnose`] plus [`render_text`] when the structured form is needed.
#[must_use]
pub fn render_report(
    subdivisions: &[Subdivision],
    links: &[Link],
    maps: &MetricMaps,
    config: &AnalysisConfig,
) -> Option<String> {
    let diagnosis = diagnose(subdivisions, links, maps, &config.thresholds)?;
    Some(TextReport(&diagnosis).to_string())
}
