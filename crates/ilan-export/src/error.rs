//! Error types for the export sink.

use thiserror::Error;

/// Errors surfaced when writing records to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem error while creating or writing the output file
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested format tag is not recognized
    #[error("unknown export format: {0:?}")]
    UnknownFormat(String),
}

/// Result type alias using [`ExportError`].
pub type Result<T> = std::result::Result<T, ExportError>;
