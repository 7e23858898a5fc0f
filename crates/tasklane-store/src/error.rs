//! Error types for tasklane document stores.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file does not contain a valid store snapshot.
    #[error("Store file {path} is corrupt: {source}")]
    Corrupt {
        /// Offending file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The backing file was written by an unsupported format revision.
    #[error("Unsupported store schema version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Revision found in the file.
        found: u32,
        /// Revision this build reads and writes.
        expected: u32,
    },

    /// Failed to serialize the store snapshot.
    #[error("Failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to acquire the store lock.
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// The backend refused or could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Other unclassified error.
    #[error("Other error: {0}")]
    Other(String),
}
