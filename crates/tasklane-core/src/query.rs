//! Store-level query description shared by every document store.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::document::{Document, FieldValue};

/// Comparison applied by a [`FieldFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Field equals the value.
    Eq,
    /// Field is ordered at or after the value.
    Gte,
    /// Field is ordered at or before the value.
    Lte,
    /// Field is present with any value.
    Exists,
}

/// A single predicate on one document field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    /// Document field name.
    pub field: String,
    /// Comparison to apply.
    pub op: FilterOp,
    /// Operand; ignored by [`FilterOp::Exists`].
    pub value: FieldValue,
}

impl FieldFilter {
    /// Evaluate the predicate. Missing fields never match.
    #[must_use]
    pub fn matches(&self, fields: &Document) -> bool {
        let Some(actual) = fields.get(&self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => actual == &self.value,
            FilterOp::Gte => matches!(
                actual.compare(&self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            FilterOp::Lte => matches!(
                actual.compare(&self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            FilterOp::Exists => true,
        }
    }
}

/// Conjunction of field filters. An empty query selects every document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Predicates, all of which must hold.
    pub filters: Vec<FieldFilter>,
}

impl Query {
    /// Query selecting the whole collection.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add an equality predicate.
    #[must_use]
    pub fn where_eq(self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.push(field, FilterOp::Eq, value.into())
    }

    /// Add a lower-bound (inclusive) predicate.
    #[must_use]
    pub fn where_gte(self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.push(field, FilterOp::Gte, value.into())
    }

    /// Add an upper-bound (inclusive) predicate.
    #[must_use]
    pub fn where_lte(self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.push(field, FilterOp::Lte, value.into())
    }

    /// Require `field` to be present, whatever its value.
    #[must_use]
    pub fn where_exists(self, field: &str) -> Self {
        self.push(field, FilterOp::Exists, FieldValue::Null)
    }

    fn push(mut self, field: &str, op: FilterOp, value: FieldValue) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_owned(),
            op,
            value,
        });
        self
    }

    /// Evaluate every predicate against the document.
    #[must_use]
    pub fn matches(&self, fields: &Document) -> bool {
        self.filters.iter().all(|filter| filter.matches(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    fn doc(entries: Vec<(&str, FieldValue)>) -> Document {
        entries
            .into_iter()
            .map(|(name, value)| (name.to_owned(), value))
            .collect()
    }

    fn ts(raw: &str) -> Timestamp {
        raw.parse().unwrap_or_else(|err| panic!("timestamp {raw}: {err}"))
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(Query::all().matches(&Document::new()));
    }

    #[test]
    fn equality_is_type_strict() {
        let fields = doc(vec![("completed", FieldValue::Bool(true))]);
        assert!(Query::all().where_eq("completed", true).matches(&fields));
        assert!(!Query::all().where_eq("completed", false).matches(&fields));
        assert!(!Query::all().where_eq("completed", "true").matches(&fields));
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let fields = doc(vec![("Completed", FieldValue::Bool(true))]);
        assert!(!Query::all().where_eq("completed", true).matches(&fields));
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let start = ts("2025-01-01T00:00:00Z");
        let end = ts("2025-01-01T23:59:59.999Z");
        let range = Query::all()
            .where_gte("dueDate", start)
            .where_lte("dueDate", end);

        assert!(range.matches(&doc(vec![("dueDate", start.into())])));
        assert!(range.matches(&doc(vec![("dueDate", end.into())])));
        assert!(!range.matches(&doc(vec![("dueDate", ts("2025-01-02T00:00:00Z").into())])));
        assert!(!range.matches(&doc(vec![("dueDate", FieldValue::Null)])));
        assert!(!range.matches(&Document::new()));
    }

    #[test]
    fn exists_matches_any_value_including_null() {
        let query = Query::all().where_exists("Completed");
        assert!(query.matches(&doc(vec![("Completed", FieldValue::Bool(false))])));
        assert!(query.matches(&doc(vec![("Completed", FieldValue::Null)])));
        assert!(!query.matches(&doc(vec![("completed", FieldValue::Bool(true))])));
    }
}
