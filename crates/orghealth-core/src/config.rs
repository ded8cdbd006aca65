//! Analysis coefficients, diagnostic thresholds and project settings.
//!
//! The engine and reporter never read ambient globals: every pass receives an
//! [`AnalysisConfig`] value. Project overrides live in
//! `.orghealth/config.toml`; a missing file means defaults.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::CompanyId;

/// Directory holding the database and config for one project.
pub const PROJECT_DIR: &str = ".orghealth";

/// Weights of the integral index `I = alpha*C - beta*D - gamma*S`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexCoefficients {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
}

impl Default for IndexCoefficients {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
        }
    }
}

/// Thresholds used by the diagnostics rules. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticThresholds {
    /// KPI below this is flagged.
    #[serde(default = "default_kpi_low")]
    pub kpi_low: f64,
    /// State above this is flagged.
    #[serde(default = "default_state_high")]
    pub state_high: f64,
    /// Link delay (hours) above this is critical.
    #[serde(default = "default_delay_crit")]
    pub delay_crit: f64,
    /// Link delay (hours) above this, and not critical, is elevated.
    #[serde(default = "default_delay_warn")]
    pub delay_warn: f64,
}

impl Default for DiagnosticThresholds {
    fn default() -> Self {
        Self {
            kpi_low: default_kpi_low(),
            state_high: default_state_high(),
            delay_crit: default_delay_crit(),
            delay_warn: default_delay_warn(),
        }
    }
}

/// Immutable configuration for one analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub coefficients: IndexCoefficients,
    #[serde(default)]
    pub thresholds: DiagnosticThresholds,
}

impl AnalysisConfig {
    /// Reject values that would make the index or the delay rules meaningless.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is non-finite or `delay_warn > delay_crit`.
    pub fn validate(&self) -> Result<()> {
        let c = &self.coefficients;
        let t = &self.thresholds;
        let fields = [
            ("coefficients.alpha", c.alpha),
            ("coefficients.beta", c.beta),
            ("coefficients.gamma", c.gamma),
            ("thresholds.kpi_low", t.kpi_low),
            ("thresholds.state_high", t.state_high),
            ("thresholds.delay_crit", t.delay_crit),
            ("thresholds.delay_warn", t.delay_warn),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                bail!("analysis.{name} must be a finite number, got {value}");
            }
        }
        if t.delay_warn > t.delay_crit {
            bail!(
                "analysis.thresholds.delay_warn ({}) must not exceed delay_crit ({})",
                t.delay_warn,
                t.delay_crit
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Company analyzed when `--company` is not given.
    #[serde(default = "default_company")]
    pub default_company: CompanyId,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_company: default_company(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl ProjectConfig {
    /// Serialize to the TOML layout read by [`load_project_config`].
    ///
    /// # Errors
    ///
    /// Returns an error if TOML serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize project config")
    }
}

/// `<root>/.orghealth`
#[must_use]
pub fn project_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR)
}

/// `<root>/.orghealth/config.toml`
#[must_use]
pub fn config_path(project_root: &Path) -> PathBuf {
    project_dir(project_root).join("config.toml")
}

/// `<root>/.orghealth/orghealth.db`
#[must_use]
pub fn default_db_path(project_root: &Path) -> PathBuf {
    project_dir(project_root).join("orghealth.db")
}

/// Load and validate the project config, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = config_path(project_root);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .analysis
        .validate()
        .with_context(|| format!("Invalid analysis settings in {}", path.display()))?;
    Ok(config)
}

const fn default_alpha() -> f64 {
    1.0
}

const fn default_beta() -> f64 {
    0.5
}

const fn default_gamma() -> f64 {
    1.0
}

const fn default_kpi_low() -> f64 {
    60.0
}

const fn default_state_high() -> f64 {
    0.6
}

const fn default_delay_crit() -> f64 {
    3.0
}

const fn default_delay_warn() -> f64 {
    1.0
}

const fn default_company() -> CompanyId {
    1
}
