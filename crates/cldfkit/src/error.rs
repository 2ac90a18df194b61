//! Error types for the cldfkit library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cldfkit operations.
#[derive(Debug, Error)]
pub enum CldfError {
    /// Invalid configuration: unknown module, unparseable default metadata.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CLDF metadata document.
    #[error("Metadata error: {0}")]
    Metadata(String),
}

impl CldfError {
    /// Wrap an `std::io::Error` together with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CldfError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for cldfkit operations.
pub type Result<T> = std::result::Result<T, CldfError>;
