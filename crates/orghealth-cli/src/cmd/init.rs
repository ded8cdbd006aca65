use std::io::Write;

use anyhow::{Context as _, Result};
use clap::Args;
use orghealth_core::config::{ProjectConfig, config_path, project_dir};
use orghealth_core::db::{self, migrations, mutate};
use serde::Serialize;
use tracing::info;

use super::{Session, display_path};
use crate::output::{pretty_kv, render};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Rewrite the default config even if `.orghealth/` already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    project_dir: String,
    config: String,
    database: String,
    company: i64,
    schema_version: u32,
}

/// Execute `orghealth init`. Creates the project skeleton:
///
/// ```text
/// .orghealth/
///   config.toml     (default coefficients, thresholds, store settings)
///   orghealth.db    (SQLite store, migrated to the latest schema)
/// ```
///
/// An existing database is opened and migrated, never truncated.
///
/// # Errors
///
/// Returns an error if `.orghealth/config.toml` already exists and `--force`
/// is not set, or if any filesystem or store operation fails.
pub fn run_init(args: &InitArgs, session: &Session) -> Result<()> {
    let root = &session.project_root;
    let dir = project_dir(root);
    let config_file = config_path(root);

    if config_file.exists() && !args.force {
        anyhow::bail!(
            ".orghealth/ already exists. Use `orghealth init --force` to rewrite the default config."
        );
    }

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create project directory: {}", dir.display()))?;

    let config = ProjectConfig::default();
    std::fs::write(&config_file, config.to_toml_string()?)
        .with_context(|| format!("Failed to write config: {}", config_file.display()))?;

    let db_path = session.db_path();
    let conn = session.store(db::open_store(&db_path))?;
    let company = session.company(&config);
    session.store(mutate::ensure_company(&conn, company))?;
    let schema_version = session.store(migrations::current_schema_version(&conn))?;

    info!(db = %db_path.display(), company, "project initialized");

    let payload = InitOutput {
        project_dir: display_path(root, &dir),
        config: display_path(root, &config_file),
        database: display_path(root, &db_path),
        company,
        schema_version,
    };

    render(session.output, &payload, |p, w| {
        writeln!(w, "✓ Initialized {} project structure.", p.project_dir)?;
        writeln!(w)?;
        pretty_kv(w, "Config", &p.config)?;
        pretty_kv(w, "Database", &p.database)?;
        pretty_kv(w, "Company", p.company.to_string())?;
        writeln!(w)?;
        writeln!(w, "Next steps:")?;
        writeln!(
            w,
            "  orghealth subdivision add --name Sales --resources 10000 --kpi 75 --state 0.3"
        )?;
        writeln!(w, "  orghealth analyze")
    })
}
