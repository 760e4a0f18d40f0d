//! Error types for the job store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or writing the jobs file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File system operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File the operation was applied to
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Records could not be serialized
    #[error("failed to serialize job records: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
