//! Per-owner task statistics.

use jiff::Timestamp;
use serde::Serialize;
use tasklane_core::TaskFilter;

use crate::async_store::AsyncDocumentStore;
use crate::error::TaskError;
use crate::task_repository::TaskRepository;

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Completed tasks.
    pub completed: usize,
    /// Tasks not yet completed.
    pub active: usize,
    /// Important tasks that are still open.
    pub important: usize,
    /// Tasks due on the local day of `now`, completed or not.
    pub due_today: u64,
}

impl Dashboard {
    /// Gather statistics for `owner_email` relative to `now`.
    ///
    /// # Errors
    /// Propagates the first repository failure.
    pub async fn load<S: AsyncDocumentStore>(
        repo: &TaskRepository<S>,
        owner_email: &str,
        now: Timestamp,
    ) -> Result<Self, TaskError> {
        let owned = || TaskFilter::builder().owner(owner_email);

        let completed = repo.list_tasks(&owned().completed(Some(true)).build()).await?;
        let active = repo.list_tasks(&owned().completed(Some(false)).build()).await?;
        let important = repo
            .list_tasks(&owned().completed(Some(false)).important(Some(true)).build())
            .await?;
        let due_today = repo.count_tasks_due_on(Some(now), Some(owner_email)).await?;

        Ok(Self {
            completed: completed.len(),
            active: active.len(),
            important: important.len(),
            due_today,
        })
    }
}
