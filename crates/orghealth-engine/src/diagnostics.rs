//! Threshold-based diagnosis of computed metrics.
//!
//! Exposes the structured form of the report: one [`SubdivisionDiagnosis`]
//! per subdivision, ordered by ascending integral index (worst first, ties
//! broken by ascending id), plus the [`WorstPerformer`] verdict. Text
//! rendering lives in [`crate::report`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use orghealth_core::config::DiagnosticThresholds;
use orghealth_core::model::{Link, LinkId, NameIndex, Subdivision, SubdivisionId};
use serde::Serialize;

use crate::metrics::MetricMaps;

/// Fixed remediation measures attached to any subdivision with findings.
pub const REMEDIATION_SUGGESTIONS: [&str; 3] = [
    "analyze causes of low efficiency",
    "redistribute load and resources",
    "optimize processes and communication channels",
];

/// Line used for a subdivision with no findings.
pub const NORMAL_RANGE_MESSAGE: &str = "within normal range, no significant issues found";

/// Severity of an outgoing link delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelaySeverity {
    /// Above `delay_crit`.
    Critical,
    /// Above `delay_warn`, at or below `delay_crit`.
    Elevated,
}

/// One rule that fired for a subdivision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    LowKpi {
        kpi: f64,
        threshold: f64,
    },
    HighState {
        state: f64,
        threshold: f64,
    },
    LinkDelay {
        severity: DelaySeverity,
        link_id: LinkId,
        from_id: SubdivisionId,
        from_name: String,
        to_id: SubdivisionId,
        /// Target name, or `ID{to_id}` when the target is unknown.
        to_name: String,
        delay: f64,
        threshold: f64,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowKpi { kpi, threshold } => {
                write!(f, "low KPI ({kpi:.1} < {threshold:.1}): reduced efficiency.")
            }
            Self::HighState { state, threshold } => write!(
                f,
                "high S_i ({state:.2} > {threshold:.2}): overload or elevated risk."
            ),
            Self::LinkDelay {
                severity,
                from_name,
                to_name,
                delay,
                threshold,
                ..
            } => {
                let label = match severity {
                    DelaySeverity::Critical => "critical",
                    DelaySeverity::Elevated => "elevated",
                };
                write!(
                    f,
                    "{label} delay on link {from_name}→{to_name} ({delay:.1} h > {threshold:.1} h)."
                )
            }
        }
    }
}

/// Metrics and findings for one subdivision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubdivisionDiagnosis {
    pub id: SubdivisionId,
    pub name: String,
    pub centrality: f64,
    pub delay: f64,
    pub kpi: f64,
    pub state: f64,
    pub index: f64,
    pub findings: Vec<Finding>,
    /// Empty when `findings` is empty.
    pub suggestions: Vec<String>,
}

impl SubdivisionDiagnosis {
    /// Returns `true` when no rule fired.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.findings.is_empty()
    }
}

/// The subdivision with the globally lowest integral index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorstPerformer {
    pub id: SubdivisionId,
    pub name: String,
    pub index: f64,
}

/// Full diagnosis of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    /// Ascending by index, then by id.
    pub entries: Vec<SubdivisionDiagnosis>,
    pub worst: WorstPerformer,
}

/// Diagnose every subdivision against `thresholds`.
///
/// Returns `None` only when `subdivisions` is empty; callers short-circuit
/// that case before computing metrics. Metric entries missing from `maps`
/// read as `0.0`.
///
/// Links are bucketed by source once, so a pass is linear in subdivisions
/// plus links (up to the map lookups).
#[must_use]
pub fn diagnose(
    subdivisions: &[Subdivision],
    links: &[Link],
    maps: &MetricMaps,
    thresholds: &DiagnosticThresholds,
) -> Option<Diagnosis> {
    let names = NameIndex::new(subdivisions);
    let outgoing = group_outgoing(links, &names);

    let mut entries: Vec<SubdivisionDiagnosis> = subdivisions
        .iter()
        .map(|sub| {
            let own = outgoing.get(&sub.id).map_or(&[][..], Vec::as_slice);
            diagnose_subdivision(sub, own, maps, thresholds, &names)
        })
        .collect();
    entries.sort_by(compare_entries);

    let first = entries.first()?;
    let worst = WorstPerformer {
        id: first.id,
        name: first.name.clone(),
        index: first.index,
    };

    Some(Diagnosis { entries, worst })
}

/// Outgoing links per known source, in input order.
fn group_outgoing<'l>(
    links: &'l [Link],
    names: &NameIndex<'_>,
) -> BTreeMap<SubdivisionId, Vec<&'l Link>> {
    let mut outgoing: BTreeMap<SubdivisionId, Vec<&'l Link>> = BTreeMap::new();
    for link in links.iter().filter(|l| names.contains(l.from_id)) {
        outgoing.entry(link.from_id).or_default().push(link);
    }
    outgoing
}

fn diagnose_subdivision(
    sub: &Subdivision,
    outgoing: &[&Link],
    maps: &MetricMaps,
    thresholds: &DiagnosticThresholds,
    names: &NameIndex<'_>,
) -> SubdivisionDiagnosis {
    let mut findings = Vec::new();

    if sub.kpi < thresholds.kpi_low {
        findings.push(Finding::LowKpi {
            kpi: sub.kpi,
            threshold: thresholds.kpi_low,
        });
    }

    if sub.state > thresholds.state_high {
        findings.push(Finding::HighState {
            state: sub.state,
            threshold: thresholds.state_high,
        });
    }

    for link in outgoing {
        let Some((severity, threshold)) = classify_delay(link.delay, thresholds) else {
            continue;
        };
        findings.push(Finding::LinkDelay {
            severity,
            link_id: link.id,
            from_id: sub.id,
            from_name: sub.name.clone(),
            to_id: link.to_id,
            to_name: names.label(link.to_id).into_owned(),
            delay: link.delay,
            threshold,
        });
    }

    let suggestions = if findings.is_empty() {
        Vec::new()
    } else {
        REMEDIATION_SUGGESTIONS
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    };

    SubdivisionDiagnosis {
        id: sub.id,
        name: sub.name.clone(),
        centrality: maps.centrality_of(sub.id),
        delay: maps.delay_of(sub.id),
        kpi: sub.kpi,
        state: sub.state,
        index: maps.index_of(sub.id),
        findings,
        suggestions,
    }
}

/// Critical takes precedence; a delay at or below `delay_warn` is not flagged.
fn classify_delay(delay: f64, thresholds: &DiagnosticThresholds) -> Option<(DelaySeverity, f64)> {
    if delay > thresholds.delay_crit {
        Some((DelaySeverity::Critical, thresholds.delay_crit))
    } else if delay > thresholds.delay_warn {
        Some((DelaySeverity::Elevated, thresholds.delay_warn))
    } else {
        None
    }
}

fn compare_entries(a: &SubdivisionDiagnosis, b: &SubdivisionDiagnosis) -> Ordering {
    a.index.total_cmp(&b.index).then_with(|| a.id.cmp(&b.id))
}
