//! Stored document representation and the canonical task schema.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::Task;
use crate::id::{IdError, TaskId};

/// Name of the collection holding task documents.
pub const TASKS_COLLECTION: &str = "tasks";

/// Body field that older payloads carried; the document key always wins over it.
const BODY_ID_FIELD: &str = "id";

/// A single field value as held by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Explicitly empty value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// UTF-8 text.
    String(String),
    /// Instant in time.
    Timestamp(Timestamp),
}

impl FieldValue {
    /// Compare two values of the same kind. Mixed kinds are unordered.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

/// Field map of a stored document.
pub type Document = BTreeMap<String, FieldValue>;

/// A document together with the key the store holds it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Key the store holds the document under.
    pub key: String,
    /// Document body.
    pub fields: Document,
}

/// Fields of the canonical task schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// Owner email.
    Email,
    /// Short summary.
    Title,
    /// Free-form details.
    Description,
    /// Completion flag.
    Completed,
    /// Importance flag.
    Important,
    /// Deadline instant.
    DueDate,
}

impl TaskField {
    /// Every schema field, in storage order.
    pub const ALL: [Self; 6] = [
        Self::Email,
        Self::Title,
        Self::Description,
        Self::Completed,
        Self::Important,
        Self::DueDate,
    ];

    /// Canonical storage name, used for both writes and filters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Title => "title",
            Self::Description => "description",
            Self::Completed => "completed",
            Self::Important => "important",
            Self::DueDate => "dueDate",
        }
    }

    /// Capitalized spelling written by earlier revisions of the app.
    #[must_use]
    pub const fn legacy_name(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Completed => "Completed",
            Self::Important => "Important",
            Self::DueDate => "DueDate",
        }
    }

    fn from_legacy_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.legacy_name() == name)
    }
}

/// Reasons a stored document cannot be read as a [`Task`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A field holds a value of the wrong kind.
    #[error("field `{field}` must be {expected}, found {found}")]
    WrongType {
        /// Canonical field name.
        field: &'static str,
        /// Kind the schema requires.
        expected: &'static str,
        /// Kind actually stored.
        found: &'static str,
    },
    /// A field still uses its capitalized name.
    #[error("legacy field `{legacy}` must be migrated to `{canonical}`")]
    LegacyField {
        /// Stored (legacy) name.
        legacy: &'static str,
        /// Name it migrates to.
        canonical: &'static str,
    },
    /// The document key is not a valid task id.
    #[error("invalid document key: {0}")]
    InvalidKey(#[from] IdError),
}

/// Encode a task as a full document. The id is never written into the body.
#[must_use]
pub fn task_to_document(task: &Task) -> Document {
    let mut doc = Document::new();
    doc.insert(TaskField::Email.name().into(), task.owner_email.clone().into());
    doc.insert(TaskField::Title.name().into(), task.title.clone().into());
    doc.insert(
        TaskField::Description.name().into(),
        task.description.clone().into(),
    );
    doc.insert(TaskField::Completed.name().into(), task.completed.into());
    doc.insert(TaskField::Important.name().into(), task.important.into());
    doc.insert(
        TaskField::DueDate.name().into(),
        task.due_date.map_or(FieldValue::Null, FieldValue::Timestamp),
    );
    doc
}

/// Decode a stored document into a [`Task`] whose id is the document key.
///
/// # Errors
/// Returns an error when the key is blank, a field has the wrong type, or the
/// document still carries legacy-cased field names.
pub fn task_from_document(stored: &StoredDocument) -> Result<Task, SchemaError> {
    let fields = &stored.fields;
    if let Some(field) = fields.keys().find_map(|key| TaskField::from_legacy_name(key)) {
        return Err(SchemaError::LegacyField {
            legacy: field.legacy_name(),
            canonical: field.name(),
        });
    }

    Ok(Task {
        id: Some(TaskId::from_key(stored.key.clone())?),
        owner_email: read_string(fields, TaskField::Email)?,
        title: read_string(fields, TaskField::Title)?,
        description: read_string(fields, TaskField::Description)?,
        completed: read_bool(fields, TaskField::Completed)?,
        important: read_bool(fields, TaskField::Important)?,
        due_date: read_timestamp(fields, TaskField::DueDate)?,
    })
}

fn read_string(fields: &Document, field: TaskField) -> Result<String, SchemaError> {
    match fields.get(field.name()) {
        None | Some(FieldValue::Null) => Ok(String::new()),
        Some(FieldValue::String(value)) => Ok(value.clone()),
        Some(other) => Err(wrong_type(field, "string", other)),
    }
}

fn read_bool(fields: &Document, field: TaskField) -> Result<bool, SchemaError> {
    match fields.get(field.name()) {
        None | Some(FieldValue::Null) => Ok(false),
        Some(FieldValue::Bool(value)) => Ok(*value),
        Some(other) => Err(wrong_type(field, "bool", other)),
    }
}

fn read_timestamp(fields: &Document, field: TaskField) -> Result<Option<Timestamp>, SchemaError> {
    match fields.get(field.name()) {
        None | Some(FieldValue::Null) => Ok(None),
        Some(FieldValue::Timestamp(value)) => Ok(Some(*value)),
        Some(other) => Err(wrong_type(field, "timestamp", other)),
    }
}

const fn wrong_type(field: TaskField, expected: &'static str, found: &FieldValue) -> SchemaError {
    SchemaError::WrongType {
        field: field.name(),
        expected,
        found: found.kind(),
    }
}

/// Outcome of rewriting one document onto the canonical schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Rewritten document body.
    pub fields: Document,
    /// Legacy keys that were renamed.
    pub renamed: Vec<TaskField>,
    /// Legacy keys dropped because the canonical key was already present.
    pub conflicts: Vec<TaskField>,
    /// Whether a stale `id` body field was removed.
    pub dropped_id: bool,
}

impl Migration {
    /// True when the document was already canonical.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.renamed.is_empty() && self.conflicts.is_empty() && !self.dropped_id
    }
}

/// Rename legacy-cased keys to canonical names and drop stale body ids.
///
/// When both spellings exist the canonical value is kept.
#[must_use]
pub fn migrate_document(fields: &Document) -> Migration {
    let mut migrated = Document::new();
    let mut renamed = Vec::new();
    let mut conflicts = Vec::new();
    let mut dropped_id = false;

    for (key, value) in fields {
        if key == BODY_ID_FIELD {
            dropped_id = true;
            continue;
        }
        match TaskField::from_legacy_name(key) {
            Some(field) if fields.contains_key(field.name()) => conflicts.push(field),
            Some(field) => {
                migrated.insert(field.name().to_owned(), value.clone());
                renamed.push(field);
            }
            None => {
                migrated.insert(key.clone(), value.clone());
            }
        }
    }

    Migration {
        fields: migrated,
        renamed,
        conflicts,
        dropped_id,
    }
}
