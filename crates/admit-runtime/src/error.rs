//! Runtime error types

use admit_core::CoreError;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Invalid setup detected while building a component
    #[error("Configuration error in {input}: {message}")]
    Configuration { input: String, message: String },

    /// A rule predicate could not be evaluated
    #[error("Rule '{rule_id}' failed to evaluate: {message}")]
    RuleEvaluation { rule_id: String, message: String },

    /// Profile field required by a check is absent
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// Field present but unusable
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl RuntimeError {
    pub fn config(input: impl Into<String>, message: impl Into<String>) -> Self {
        RuntimeError::Configuration {
            input: input.into(),
            message: message.into(),
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_input() {
        let error = RuntimeError::config("subject_weights", "weight map is required");
        assert_eq!(
            error.to_string(),
            "Configuration error in subject_weights: weight map is required"
        );
    }

    #[test]
    fn test_core_error_conversion() {
        let error: RuntimeError = CoreError::InvalidSeverity(7).into();
        assert!(error.to_string().contains("Invalid severity: 7"));
    }
}
