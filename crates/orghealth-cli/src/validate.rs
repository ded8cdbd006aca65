use crate::output::CliError;
use orghealth_core::model::{
    DELAY_RANGE, IMPORTANCE_RANGE, KPI_RANGE, RESOURCES_RANGE, STATE_RANGE, ValueRange,
};

pub const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
    pub suggestion: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
            code,
        }
    }

    pub fn to_cli_error(&self) -> CliError {
        CliError::with_details(
            format!("invalid {} '{}': {}", self.field, self.value, self.reason),
            self.suggestion.clone(),
            self.code,
        )
    }
}

pub fn validate_name(s: &str) -> Result<(), ValidationError> {
    if s.trim().is_empty() {
        return Err(ValidationError::new(
            "name",
            s,
            "must not be empty",
            "provide a non-empty --name",
            "invalid_name",
        ));
    }
    if s.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            s,
            format!("must be <= {MAX_NAME_LEN} characters"),
            "shorten the name",
            "invalid_name",
        ));
    }
    if s.chars().any(char::is_control) {
        return Err(ValidationError::new(
            "name",
            s,
            "must not contain control characters",
            "remove control characters from the name",
            "invalid_name",
        ));
    }
    Ok(())
}

fn validate_in_range(
    field: &'static str,
    value: f64,
    range: ValueRange,
    code: &'static str,
) -> Result<(), ValidationError> {
    if range.contains(value) {
        return Ok(());
    }
    Err(ValidationError::new(
        field,
        value.to_string(),
        format!("must be in range {range}"),
        format!("pass --{field} between {} and {}", range.min, range.max),
        code,
    ))
}

pub fn validate_resources(value: f64) -> Result<(), ValidationError> {
    validate_in_range("resources", value, RESOURCES_RANGE, "invalid_resources")
}

pub fn validate_kpi(value: f64) -> Result<(), ValidationError> {
    validate_in_range("kpi", value, KPI_RANGE, "invalid_kpi")
}

pub fn validate_state(value: f64) -> Result<(), ValidationError> {
    validate_in_range("state", value, STATE_RANGE, "invalid_state")
}

pub fn validate_importance(value: f64) -> Result<(), ValidationError> {
    validate_in_range("importance", value, IMPORTANCE_RANGE, "invalid_importance")
}

pub fn validate_delay(value: f64) -> Result<(), ValidationError> {
    validate_in_range("delay", value, DELAY_RANGE, "invalid_delay")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(validate_name("Logistics").is_ok());
        assert_eq!(validate_name("   ").unwrap_err().code, "invalid_name");
        assert!(validate_name("bad\tname").is_err());
        assert!(validate_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(validate_kpi(0.0).is_ok());
        assert!(validate_kpi(100.0).is_ok());
        assert!(validate_state(1.0).is_ok());
        assert!(validate_delay(72.0).is_ok());
        assert!(validate_importance(10.0).is_ok());
        assert!(validate_resources(1_000_000.0).is_ok());
    }

    #[test]
    fn out_of_range_values_carry_field_codes() {
        assert_eq!(validate_kpi(100.5).unwrap_err().code, "invalid_kpi");
        assert_eq!(validate_state(-0.01).unwrap_err().code, "invalid_state");
        assert_eq!(validate_delay(73.0).unwrap_err().code, "invalid_delay");
        assert_eq!(
            validate_importance(11.0).unwrap_err().code,
            "invalid_importance"
        );
        assert_eq!(
            validate_resources(-1.0).unwrap_err().code,
            "invalid_resources"
        );
        assert!(validate_kpi(f64::NAN).is_err());
    }

    #[test]
    fn cli_error_mentions_range() {
        let err = validate_state(1.5).unwrap_err().to_cli_error();
        assert_eq!(err.message, "invalid state '1.5': must be in range [0; 1]");
        assert_eq!(err.error_code.as_deref(), Some("invalid_state"));
        assert_eq!(
            err.suggestion.as_deref(),
            Some("pass --state between 0 and 1")
        );
    }
}
