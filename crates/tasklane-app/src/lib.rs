//! Application layer logic for tasklane.
//!
//! This crate provides the task repository façade, configuration, and
//! helpers shared by the command-line front end.

pub mod async_store;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter_util;
pub mod task_repository;

// Re-exports for convenience
pub use async_store::{AsyncDocumentStore, BoxError};
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use error::TaskError;
pub use filter_util::{
    FilterBuildError, StatusFilter, list_filter, parse_due_date, parse_flag, parse_status,
};
pub use task_repository::{MigrationReport, TaskRepository};
