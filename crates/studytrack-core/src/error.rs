//! Error types for studytrack-core.
//!
//! Storage failures are deliberately non-fatal: the store applies every
//! write in memory first and reports persistence problems through these
//! types, so callers can surface them without losing the state change.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the persistent store and its storage media.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Value could not be serialized for persistence.
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The storage medium rejected a read or write.
    #[error("storage medium failed for key '{key}': {message}")]
    Medium { key: String, message: String },

    /// Filesystem-level failure in the file medium.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
