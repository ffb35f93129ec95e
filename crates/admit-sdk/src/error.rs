//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parser error
    #[error("Parser error: {0}")]
    ParseError(#[from] admit_parser::ParseError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] admit_runtime::RuntimeError),

    /// Core data error
    #[error("Core error: {0}")]
    CoreError(#[from] admit_core::CoreError),

    /// Engine config could not be read
    #[error("Invalid engine config: {0}")]
    InvalidConfig(#[from] serde_yaml::Error),

    /// Assessment could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
