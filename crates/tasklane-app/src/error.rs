//! Errors surfaced by the task repository.

use tasklane_core::{SchemaError, TaskId};
use thiserror::Error;

use crate::async_store::BoxError;

/// Failures surfaced by [`crate::TaskRepository`].
#[derive(Debug, Error)]
pub enum TaskError {
    /// Reading from the store failed.
    #[error("task query failed: {0}")]
    QueryFailed(#[source] BoxError),

    /// Writing to the store failed.
    #[error("task write failed: {0}")]
    WriteFailed(#[source] BoxError),

    /// The addressed task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A stored document does not follow the canonical schema.
    #[error("stored task {key} is invalid: {source}")]
    InvalidDocument {
        /// Key of the offending document.
        key: String,
        /// Schema violation.
        #[source]
        source: SchemaError,
    },

    /// Day boundaries could not be computed for the requested instant.
    #[error("cannot compute day boundaries: {0}")]
    DayBoundary(#[from] jiff::Error),
}

impl TaskError {
    pub(crate) fn query(err: impl Into<BoxError>) -> Self {
        Self::QueryFailed(err.into())
    }

    pub(crate) fn write(err: impl Into<BoxError>) -> Self {
        Self::WriteFailed(err.into())
    }

    /// Short machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::QueryFailed(_) => "query_failed",
            Self::WriteFailed(_) => "write_failed",
            Self::NotFound(_) => "not_found",
            Self::InvalidDocument { .. } => "invalid_document",
            Self::DayBoundary(_) => "invalid_date",
        }
    }
}
