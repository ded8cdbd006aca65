use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    SubdivisionNotFound,
    LinkNotFound,
    InsufficientSubdivisions,
    StoreFailure,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::SubdivisionNotFound => "E2001",
            Self::LinkNotFound => "E2002",
            Self::InsufficientSubdivisions => "E2003",
            Self::StoreFailure => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::SubdivisionNotFound => "Subdivision not found",
            Self::LinkNotFound => "Link not found",
            Self::InsufficientSubdivisions => "Insufficient subdivisions for analysis",
            Self::StoreFailure => "SQLite store failure",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `orghealth init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .orghealth/config.toml and retry."),
            Self::SubdivisionNotFound | Self::LinkNotFound => {
                Some("List records with `orghealth subdivision list` or `orghealth link list`.")
            }
            Self::InsufficientSubdivisions => {
                Some("Add at least two subdivisions before running `orghealth analyze`.")
            }
            Self::StoreFailure => Some("Check that the database file is readable and writable."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Fatal analysis failures raised by the metrics engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Normalization divides by `n - 1`, so at least two subdivisions are needed.
    #[error("insufficient subdivisions for analysis: need at least 2, found {found}")]
    InsufficientSubdivisions { found: usize },
}

impl AnalysisError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InsufficientSubdivisions { .. } => ErrorCode::InsufficientSubdivisions,
        }
    }
}
