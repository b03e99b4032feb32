//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

/// Configuration problems detected before any computation runs.
#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Row field not found in dataset: {0}")]
    UnknownRowField(String),

    #[error("Value field not found in dataset: {0}")]
    UnknownValueField(String),

    #[error("Column field not found in dataset: {0}")]
    UnknownColumnField(String),

    #[error("Row field is not set")]
    EmptyRowField,

    #[error("Value field is not set")]
    EmptyValueField,

    #[error("Malformed pivot result: {0}")]
    MalformedResult(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PivotError>;
