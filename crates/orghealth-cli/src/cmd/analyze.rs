//! `orghealth analyze`: load, compute, diagnose and report.

use anyhow::Result;
use clap::Args;
use orghealth_core::db::query;
use orghealth_engine::{AnalysisOutcome, analyze, render_text};
use serde::Serialize;
use tracing::info;

use super::Session;
use crate::output::render;

/// Message printed when the company has no subdivisions.
pub const NO_DATA_MESSAGE: &str = "no data for analysis (no subdivisions)";

/// Message printed when the selected company was never created.
pub const UNKNOWN_COMPANY_MESSAGE: &str = "no data for analysis (company not found)";

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {}

#[derive(Debug, Serialize)]
struct NoDataOutput {
    company: i64,
    message: &'static str,
}

pub fn run_analyze(_args: &AnalyzeArgs, session: &Session) -> Result<()> {
    let config = session.load_config()?;
    let company = session.company(&config);
    let conn = session.open_store()?;

    let snapshot = session.store(query::load_company(&conn, company))?;
    let unknown_company = snapshot.subdivisions.is_empty()
        && !session.store(query::company_exists(&conn, company))?;
    drop(conn);

    let outcome = match analyze(&snapshot, &config.analysis) {
        Ok(outcome) => outcome,
        Err(err) => return session.fail(err.error_code(), err.to_string()),
    };

    match outcome {
        AnalysisOutcome::NoData => render(
            session.output,
            &NoDataOutput {
                company,
                message: if unknown_company {
                    UNKNOWN_COMPANY_MESSAGE
                } else {
                    NO_DATA_MESSAGE
                },
            },
            |p, w| writeln!(w, "{}.", p.message),
        ),
        AnalysisOutcome::Report(diagnosis) => {
            info!(
                company,
                subdivisions = diagnosis.entries.len(),
                worst = diagnosis.worst.id,
                "analysis complete"
            );
            render(session.output, &diagnosis, |d, w| render_text(d, w))
        }
    }
}
