pub mod analyze;
pub mod completions;
pub mod config;
pub mod init;
pub mod link;
pub mod subdivision;

use std::path::{Path, PathBuf};

use anyhow::Result;
use orghealth_core::config::{ProjectConfig, default_db_path, load_project_config};
use orghealth_core::db;
use orghealth_core::error::ErrorCode;
use orghealth_core::model::CompanyId;
use rusqlite::Connection;

use crate::output::{CliError, OutputMode, render_error};
use crate::validate::ValidationError;

/// Per-invocation settings shared by every store-backed command.
#[derive(Debug, Clone)]
pub struct Session {
    pub project_root: PathBuf,
    pub db_override: Option<PathBuf>,
    pub company_override: Option<CompanyId>,
    pub output: OutputMode,
}

impl Session {
    /// Database path: `--db` when given, else `.orghealth/orghealth.db`.
    pub fn db_path(&self) -> PathBuf {
        self.db_override
            .clone()
            .unwrap_or_else(|| default_db_path(&self.project_root))
    }

    /// Load `.orghealth/config.toml`, rendering a parse error on failure.
    pub fn load_config(&self) -> Result<ProjectConfig> {
        match load_project_config(&self.project_root) {
            Ok(config) => Ok(config),
            Err(err) => {
                render_error(
                    self.output,
                    &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
                )?;
                Err(err)
            }
        }
    }

    /// Company id: `--company` when given, else the configured default.
    pub fn company(&self, config: &ProjectConfig) -> CompanyId {
        self.company_override
            .unwrap_or(config.store.default_company)
    }

    /// Open the existing store, failing with `E1001` when it was never
    /// initialized and `E3001` when it cannot be opened or migrated.
    pub fn open_store(&self) -> Result<Connection> {
        let path = self.db_path();
        match self.store(db::try_open_store(&path))? {
            Some(conn) => Ok(conn),
            None => {
                render_error(
                    self.output,
                    &CliError::from_code(
                        ErrorCode::NotInitialized,
                        format!("store database not found at {}", path.display()),
                    ),
                )?;
                anyhow::bail!("store not initialized");
            }
        }
    }

    /// Pass a store result through, rendering any error as `E3001`.
    pub fn store<T, E>(&self, result: Result<T, E>) -> Result<T>
    where
        E: Into<anyhow::Error>,
    {
        result.map_err(Into::into).or_else(|err| {
            render_error(
                self.output,
                &CliError::from_code(ErrorCode::StoreFailure, format!("{err:#}")),
            )?;
            Err(err)
        })
    }

    /// Render a validation failure and turn it into a command error.
    pub fn reject(&self, err: &ValidationError) -> Result<()> {
        render_error(self.output, &err.to_cli_error())?;
        anyhow::bail!("{}", err.code)
    }

    /// Render a catalogued failure and turn it into a command error.
    pub fn fail(&self, code: ErrorCode, message: impl Into<String>) -> Result<()> {
        let error = CliError::from_code(code, message);
        render_error(self.output, &error)?;
        anyhow::bail!("{}", error.message)
    }
}

/// Display path relative to the project root when possible.
pub fn display_path(project_root: &Path, path: &Path) -> String {
    path.strip_prefix(project_root)
        .unwrap_or(path)
        .display()
        .to_string()
}
