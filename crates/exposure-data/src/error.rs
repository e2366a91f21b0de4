//! Error types for data operations.

use exposure_core::ExposureError;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading or validating a dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Dataset content is inconsistent
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Reference data rejected by the pipeline
    #[error("Invalid reference data: {0}")]
    Reference(#[from] ExposureError),
}
