//! Domain types for tasklane: the task record, its stored-document schema,
//! store queries, and local-day boundaries.

/// Calendar-day boundaries.
pub mod day;
/// Document schema and task mapping.
pub mod document;
/// Task filter criteria.
pub mod filter;
/// Identifier types.
pub mod id;
/// Store-level query predicates.
pub mod query;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub use day::{DayBounds, day_bounds};
pub use document::{
    Document, FieldValue, Migration, SchemaError, StoredDocument, TASKS_COLLECTION, TaskField,
    migrate_document, task_from_document, task_to_document,
};
pub use filter::{DueRange, TaskFilter, TaskFilterBuilder};
pub use id::{IdError, TaskId};
pub use query::{FieldFilter, FilterOp, Query};

/// A to-do item.
///
/// `id` is `None` until the store has assigned a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned key.
    pub id: Option<TaskId>,
    /// Email of the owning user.
    pub owner_email: String,
    /// Short summary.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Whether the task is done.
    pub completed: bool,
    /// Whether the task is flagged important.
    pub important: bool,
    /// Optional deadline.
    pub due_date: Option<Timestamp>,
}

impl Task {
    /// Create an unsaved task with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Attach a store key.
    #[must_use]
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the owning user's email.
    #[must_use]
    pub fn with_owner(mut self, email: impl Into<String>) -> Self {
        self.owner_email = email.into();
        self
    }

    /// Set the free-form details.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Set the importance flag.
    #[must_use]
    pub const fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Set the deadline.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Timestamp) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_unsaved_with_defaults() {
        let task = Task::new("Buy milk");
        assert!(task.id.is_none());
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
        assert!(!task.important);
        assert_eq!(task.due_date, None);
    }
}
