//! Parser error types

use thiserror::Error;

/// Parser error
#[derive(Error, Debug)]
pub enum ParseError {
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Type mismatch
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Unknown field
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Unknown predicate kind in a `when` block
    #[error("Unknown predicate: {0}")]
    UnknownPredicate(String),

    /// Generic parse error
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ParseError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        ParseError::MissingField {
            field: field.into(),
        }
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
