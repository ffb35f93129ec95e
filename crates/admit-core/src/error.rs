//! Error types for Admit Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unknown track: {0}")]
    UnknownTrack(String),

    #[error("Invalid severity: {0} (expected 1 or 2)")]
    InvalidSeverity(u8),
}

pub type Result<T> = std::result::Result<T, CoreError>;
