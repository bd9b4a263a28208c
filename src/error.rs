//! Error types for the clfbench harness

use thiserror::Error;

/// Result type alias for clfbench operations
pub type Result<T> = std::result::Result<T, ClfBenchError>;

/// Main error type for the harness
///
/// Every variant is fatal: a partially completed comparison is not meaningful,
/// so errors abort the run instead of degrading it.
#[derive(Error, Debug)]
pub enum ClfBenchError {
    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("Column '{column}' not found; available columns: {}", available.join(", "))]
    SchemaError {
        column: String,
        available: Vec<String>,
    },

    #[error("Unsupported source format: {0}")]
    FormatError(String),

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Invalid parameter '{name}' for {family}: {reason}")]
    InvalidParam {
        family: String,
        name: String,
        reason: String,
    },

    #[error("Cannot stratify: class '{class}' has only {count} sample(s), need at least 2")]
    StratifyError { class: String, count: usize },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for ClfBenchError {
    fn from(err: polars::error::PolarsError) -> Self {
        ClfBenchError::DataError(err.to_string())
    }
}

impl From<bincode::Error> for ClfBenchError {
    fn from(err: bincode::Error) -> Self {
        ClfBenchError::SerializationError(err.to_string())
    }
}
