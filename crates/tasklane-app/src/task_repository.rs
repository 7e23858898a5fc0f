//! Task repository façade over a keyed document store.

use jiff::Timestamp;
use jiff::tz::TimeZone;
use tasklane_core::{
    Query, SchemaError, StoredDocument, TASKS_COLLECTION, Task, TaskField, TaskFilter, TaskId,
    day_bounds, migrate_document, task_from_document, task_to_document,
};
use tracing::{debug, info, warn};

use crate::async_store::AsyncDocumentStore;
use crate::error::TaskError;

/// Result of a schema migration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Documents inspected.
    pub scanned: usize,
    /// Documents that were (or, in a dry run, would be) rewritten.
    pub rewritten: Vec<TaskId>,
    /// Documents that carried both spellings of a field.
    pub conflicted: Vec<TaskId>,
}

/// Reads and writes tasks in the `tasks` collection.
///
/// Listing applies no ordering of its own and there is no cache. Reads that
/// filter or count first check the collection for legacy-cased fields, so a
/// document off the canonical schema fails every read instead of silently
/// dropping out of filtered results.
pub struct TaskRepository<S> {
    store: S,
    collection: String,
    time_zone: TimeZone,
}

impl<S: AsyncDocumentStore> TaskRepository<S> {
    /// Create a repository over `store` using the system time zone.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            collection: TASKS_COLLECTION.to_owned(),
            time_zone: TimeZone::system(),
        }
    }

    /// Use `time_zone` when computing "due on a day" ranges.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Time zone used for day boundaries.
    #[must_use]
    pub const fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// List tasks matching every criterion of `filter`, in store order.
    ///
    /// # Errors
    /// Returns [`TaskError::QueryFailed`] when the store read fails and
    /// [`TaskError::InvalidDocument`] when any stored document is off-schema.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskError> {
        self.reject_legacy_documents().await?;
        let query = filter.to_query();
        debug!(collection = %self.collection, filters = query.filters.len(), "Listing tasks");
        let documents = self
            .store
            .query(&self.collection, &query)
            .await
            .map_err(TaskError::query)?;
        documents.iter().map(decode).collect()
    }

    /// Fetch a single task.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] when no document exists under `id`.
    pub async fn get_task(&self, id: &TaskId) -> Result<Task, TaskError> {
        let document = self
            .store
            .get(&self.collection, id.as_str())
            .await
            .map_err(TaskError::query)?
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;
        decode(&document)
    }

    /// Create or fully replace a task and return its id.
    ///
    /// When `owner_email` is given it overwrites the task's owner. A task
    /// without an id is created under a store-generated key; otherwise the
    /// record at its key is replaced as a whole, so fields the caller left at
    /// their defaults are written as defaults.
    ///
    /// # Errors
    /// Returns [`TaskError::WriteFailed`] when the store write fails.
    pub async fn upsert_task(&self, mut task: Task, owner_email: Option<&str>) -> Result<TaskId, TaskError> {
        if let Some(owner) = owner_email {
            owner.clone_into(&mut task.owner_email);
        }
        let fields = task_to_document(&task);

        if let Some(id) = task.id {
            self.store
                .set(&self.collection, id.as_str(), fields)
                .await
                .map_err(TaskError::write)?;
            info!(task = %id, "Replaced task");
            return Ok(id);
        }

        let key = self
            .store
            .add(&self.collection, fields)
            .await
            .map_err(TaskError::write)?;
        let id = TaskId::from_key(key).map_err(|err| TaskError::write(err.to_string()))?;
        info!(task = %id, "Created task");
        Ok(id)
    }

    /// Delete a task. Deleting an unknown id succeeds.
    ///
    /// # Errors
    /// Returns [`TaskError::WriteFailed`] when the store write fails.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), TaskError> {
        self.store
            .delete(&self.collection, id.as_str())
            .await
            .map_err(TaskError::write)?;
        info!(task = %id, "Deleted task");
        Ok(())
    }

    /// Set the completion flag of an existing task, keeping every other field.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids and store errors otherwise.
    pub async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<Task, TaskError> {
        let mut task = self.get_task(id).await?;
        task.completed = completed;
        self.upsert_task(task.clone(), None).await?;
        Ok(task)
    }

    /// Count tasks whose due date falls on the local calendar day of `instant`.
    ///
    /// Without an instant no date criterion is applied and every task (of the
    /// owner, when given) is counted.
    ///
    /// # Errors
    /// Returns [`TaskError::QueryFailed`] when the store read fails and
    /// [`TaskError::InvalidDocument`] when any stored document is off-schema.
    pub async fn count_tasks_due_on(
        &self,
        instant: Option<Timestamp>,
        owner_email: Option<&str>,
    ) -> Result<u64, TaskError> {
        let mut builder = TaskFilter::builder().owner_opt(owner_email);
        if let Some(instant) = instant {
            let bounds = day_bounds(instant, &self.time_zone)?;
            debug!(date = %bounds.date, start = %bounds.start, end = %bounds.end, "Counting tasks due");
            builder = builder.due_within(bounds);
        } else {
            warn!("Counting due tasks without a date; no due-date criterion applied");
        }
        let query = builder.build().to_query();
        self.reject_legacy_documents().await?;
        self.store
            .count(&self.collection, &query)
            .await
            .map_err(TaskError::query)
    }

    /// Rewrite documents that still use legacy field casing.
    ///
    /// With `dry_run` nothing is written; the report lists what would change.
    ///
    /// # Errors
    /// Returns [`TaskError::QueryFailed`] or [`TaskError::WriteFailed`] on store errors.
    pub async fn migrate_legacy_fields(&self, dry_run: bool) -> Result<MigrationReport, TaskError> {
        let documents = self
            .store
            .query(&self.collection, &Query::all())
            .await
            .map_err(TaskError::query)?;

        let mut report = MigrationReport {
            scanned: documents.len(),
            ..MigrationReport::default()
        };
        for document in documents {
            let migration = migrate_document(&document.fields);
            if migration.is_noop() {
                continue;
            }
            let id = TaskId::from_key(document.key.clone()).map_err(|source| TaskError::InvalidDocument {
                key: document.key.clone(),
                source: source.into(),
            })?;
            if !migration.conflicts.is_empty() {
                warn!(task = %id, conflicts = ?migration.conflicts, "Dropped legacy fields shadowed by canonical ones");
                report.conflicted.push(id.clone());
            }
            if !dry_run {
                self.store
                    .set(&self.collection, id.as_str(), migration.fields)
                    .await
                    .map_err(TaskError::write)?;
            }
            report.rewritten.push(id);
        }

        info!(
            scanned = report.scanned,
            rewritten = report.rewritten.len(),
            dry_run,
            "Migrated legacy task fields"
        );
        Ok(report)
    }
}

impl<S: AsyncDocumentStore> TaskRepository<S> {
    async fn reject_legacy_documents(&self) -> Result<(), TaskError> {
        for field in TaskField::ALL {
            let query = Query::all().where_exists(field.legacy_name());
            let found = self
                .store
                .query(&self.collection, &query)
                .await
                .map_err(TaskError::query)?;
            if let Some(document) = found.into_iter().next() {
                warn!(task = %document.key, field = field.legacy_name(), "Found legacy-cased task field");
                return Err(TaskError::InvalidDocument {
                    key: document.key,
                    source: SchemaError::LegacyField {
                        legacy: field.legacy_name(),
                        canonical: field.name(),
                    },
                });
            }
        }
        Ok(())
    }
}

fn decode(document: &StoredDocument) -> Result<Task, TaskError> {
    task_from_document(document).map_err(|source| TaskError::InvalidDocument {
        key: document.key.clone(),
        source,
    })
}
