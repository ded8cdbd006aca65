//! Per-subdivision metrics: centrality, cumulative delay and integral index.
//!
//! # Overview
//!
//! The model is one hop and outbound only. For subdivision `i`:
//!
//! ```text
//! C_i = (Σ W_ij over links i→j) / (n - 1)
//! D_i =  Σ Δt_ij over links i→j
//! I_i = alpha*C_i - beta*D_i - gamma*S_i
//! ```
//!
//! `n` is the total subdivision count, not the number of subdivisions with
//! outgoing links. Links whose source is not a known subdivision contribute
//! nothing and are skipped without error.

use std::collections::BTreeMap;

use orghealth_core::config::IndexCoefficients;
use orghealth_core::error::AnalysisError;
use orghealth_core::model::{Link, Subdivision, SubdivisionId};
use serde::Serialize;
use tracing::{debug, instrument};

/// Metric maps keyed by subdivision id.
///
/// Every map holds exactly one entry per subdivision passed to
/// [`compute_metrics`], including subdivisions with no outgoing links.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricMaps {
    /// Normalized outgoing importance `C_i`.
    pub centrality: BTreeMap<SubdivisionId, f64>,
    /// Summed outgoing delay hours `D_i`.
    pub delay: BTreeMap<SubdivisionId, f64>,
    /// Integral index `I_i`.
    pub index: BTreeMap<SubdivisionId, f64>,
}

impl MetricMaps {
    #[must_use]
    pub fn centrality_of(&self, id: SubdivisionId) -> f64 {
        self.centrality.get(&id).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn delay_of(&self, id: SubdivisionId) -> f64 {
        self.delay.get(&id).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn index_of(&self, id: SubdivisionId) -> f64 {
        self.index.get(&id).copied().unwrap_or(0.0)
    }
}

/// Linear scalarization `alpha*C - beta*D - gamma*S`.
#[must_use]
pub fn integral_index(
    centrality: f64,
    delay: f64,
    state: f64,
    coefficients: &IndexCoefficients,
) -> f64 {
    (coefficients.alpha * centrality) - (coefficients.beta * delay) - (coefficients.gamma * state)
}

/// Compute centrality, cumulative delay and integral index for every
/// subdivision.
///
/// # Errors
///
/// Returns [`AnalysisError::InsufficientSubdivisions`] when fewer than two
/// subdivisions are supplied, regardless of the links.
#[instrument(skip_all, fields(subdivisions = subdivisions.len(), links = links.len()))]
pub fn compute_metrics(
    subdivisions: &[Subdivision],
    links: &[Link],
    coefficients: &IndexCoefficients,
) -> Result<MetricMaps, AnalysisError> {
    let n = subdivisions.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientSubdivisions { found: n });
    }

    let mut centrality: BTreeMap<SubdivisionId, f64> =
        subdivisions.iter().map(|s| (s.id, 0.0)).collect();
    let mut delay: BTreeMap<SubdivisionId, f64> =
        subdivisions.iter().map(|s| (s.id, 0.0)).collect();

    let mut skipped = 0usize;
    for link in links {
        let (Some(c), Some(d)) = (
            centrality.get_mut(&link.from_id),
            delay.get_mut(&link.from_id),
        ) else {
            debug!(
                link_id = link.id,
                from_id = link.from_id,
                "link source is not a known subdivision, skipping"
            );
            skipped += 1;
            continue;
        };
        *c += link.importance;
        *d += link.delay;
    }

    #[allow(clippy::cast_precision_loss)]
    let denominator = (n - 1) as f64;
    for value in centrality.values_mut() {
        *value /= denominator;
    }

    let index = subdivisions
        .iter()
        .map(|s| {
            let c = centrality.get(&s.id).copied().unwrap_or(0.0);
            let d = delay.get(&s.id).copied().unwrap_or(0.0);
            (s.id, integral_index(c, d, s.state, coefficients))
        })
        .collect();

    debug!(skipped, "metrics computed");

    Ok(MetricMaps {
        centrality,
        delay,
        index,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_eq(actual: f64, expected: f64) {
        let tolerance = 1e-10;
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual ({actual}) != expected ({expected})"
        );
    }

    fn sub(id: SubdivisionId, kpi: f64, state: f64) -> Subdivision {
        Subdivision {
            id,
            name: format!("S{id}"),
            resources: 1000.0,
            kpi,
            state,
        }
    }

    fn link(id: i64, from_id: SubdivisionId, to_id: SubdivisionId, w: f64, dt: f64) -> Link {
        Link {
            id,
            from_id,
            to_id,
            importance: w,
            delay: dt,
        }
    }

    #[test]
    fn fewer_than_two_subdivisions_fails() {
        let coefficients = IndexCoefficients::default();
        assert_eq!(
            compute_metrics(&[], &[], &coefficients),
            Err(AnalysisError::InsufficientSubdivisions { found: 0 })
        );
        assert_eq!(
            compute_metrics(&[sub(1, 80.0, 0.1)], &[link(1, 1, 1, 5.0, 1.0)], &coefficients),
            Err(AnalysisError::InsufficientSubdivisions { found: 1 })
        );
    }

    #[test]
    fn every_subdivision_gets_an_entry() {
        let subs = vec![sub(1, 80.0, 0.1), sub(2, 80.0, 0.2), sub(3, 80.0, 0.3)];
        let maps = compute_metrics(&subs, &[], &IndexCoefficients::default()).expect("metrics");

        for map in [&maps.centrality, &maps.delay, &maps.index] {
            assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        }
        assert_approx_eq(maps.index_of(3), -0.3);
    }

    #[test]
    fn centrality_normalized_by_total_count() {
        // Four subdivisions, only one has an outgoing link.
        let subs = vec![
            sub(1, 80.0, 0.0),
            sub(2, 80.0, 0.0),
            sub(3, 80.0, 0.0),
            sub(4, 80.0, 0.0),
        ];
        let links = vec![link(1, 1, 2, 6.0, 0.0)];
        let maps = compute_metrics(&subs, &links, &IndexCoefficients::default()).expect("metrics");

        assert_approx_eq(maps.centrality_of(1), 2.0);
        assert_approx_eq(maps.centrality_of(2), 0.0);
    }

    #[test]
    fn multiple_outgoing_links_accumulate() {
        let subs = vec![sub(1, 80.0, 0.5), sub(2, 80.0, 0.0), sub(3, 80.0, 0.0)];
        let links = vec![link(1, 1, 2, 4.0, 1.5), link(2, 1, 3, 2.0, 2.5)];
        let maps = compute_metrics(&subs, &links, &IndexCoefficients::default()).expect("metrics");

        assert_approx_eq(maps.centrality_of(1), 3.0);
        assert_approx_eq(maps.delay_of(1), 4.0);
        // 1.0*3.0 - 0.5*4.0 - 1.0*0.5
        assert_approx_eq(maps.index_of(1), 0.5);
    }

    #[test]
    fn dangling_source_is_skipped() {
        let subs = vec![sub(1, 80.0, 0.0), sub(2, 80.0, 0.0)];
        let links = vec![link(1, 99, 1, 10.0, 72.0)];
        let maps = compute_metrics(&subs, &links, &IndexCoefficients::default()).expect("metrics");

        assert!(!maps.centrality.contains_key(&99));
        assert_approx_eq(maps.centrality_of(1), 0.0);
        assert_approx_eq(maps.delay_of(1), 0.0);
    }

    #[test]
    fn dangling_target_still_counts_for_source() {
        let subs = vec![sub(1, 80.0, 0.0), sub(2, 80.0, 0.0)];
        let links = vec![link(1, 1, 404, 3.0, 2.0)];
        let maps = compute_metrics(&subs, &links, &IndexCoefficients::default()).expect("metrics");

        assert_approx_eq(maps.centrality_of(1), 3.0);
        assert_approx_eq(maps.delay_of(1), 2.0);
    }

    #[test]
    fn custom_coefficients_are_applied() {
        let coefficients = IndexCoefficients {
            alpha: 2.0,
            beta: 0.0,
            gamma: 3.0,
        };
        let subs = vec![sub(1, 80.0, 0.5), sub(2, 80.0, 0.0)];
        let links = vec![link(1, 1, 2, 1.0, 10.0)];
        let maps = compute_metrics(&subs, &links, &coefficients).expect("metrics");

        // 2.0*1.0 - 0.0*10.0 - 3.0*0.5
        assert_approx_eq(maps.index_of(1), 0.5);
    }

    #[test]
    fn integral_index_is_linear_in_state() {
        let coefficients = IndexCoefficients::default();
        let base = integral_index(2.0, 4.0, 0.3, &coefficients);
        let doubled = integral_index(2.0, 4.0, 0.6, &coefficients);
        assert_approx_eq(base - doubled, coefficients.gamma * 0.3);
    }
}
