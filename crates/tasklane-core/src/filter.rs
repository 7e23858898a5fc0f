//! Task filter criteria and their translation into store queries.

use jiff::Timestamp;

use crate::day::DayBounds;
use crate::document::TaskField;
use crate::query::Query;

/// Inclusive due-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueRange {
    /// Earliest due instant.
    pub from: Timestamp,
    /// Latest due instant.
    pub to: Timestamp,
}

impl From<DayBounds> for DueRange {
    fn from(bounds: DayBounds) -> Self {
        Self {
            from: bounds.start,
            to: bounds.end,
        }
    }
}

/// Task filter; every present criterion must hold (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to tasks owned by this email.
    pub owner_email: Option<String>,
    /// Restrict by completion flag.
    pub completed: Option<bool>,
    /// Restrict by importance flag.
    pub important: Option<bool>,
    /// Restrict to tasks due within the range.
    pub due: Option<DueRange>,
}

impl TaskFilter {
    /// Start building a filter.
    #[must_use]
    pub fn builder() -> TaskFilterBuilder {
        TaskFilterBuilder::default()
    }

    /// Translate the filter into a store query over the canonical schema.
    #[must_use]
    pub fn to_query(&self) -> Query {
        let mut query = Query::all();
        if let Some(owner) = &self.owner_email {
            query = query.where_eq(TaskField::Email.name(), owner.as_str());
        }
        if let Some(completed) = self.completed {
            query = query.where_eq(TaskField::Completed.name(), completed);
        }
        if let Some(important) = self.important {
            query = query.where_eq(TaskField::Important.name(), important);
        }
        if let Some(range) = self.due {
            query = query
                .where_gte(TaskField::DueDate.name(), range.from)
                .where_lte(TaskField::DueDate.name(), range.to);
        }
        query
    }
}

/// Builder for [`TaskFilter`].
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Restrict to one owner.
    #[must_use]
    pub fn owner(mut self, email: impl Into<String>) -> Self {
        self.filter.owner_email = Some(email.into());
        self
    }

    /// Restrict to one owner when `email` is present.
    #[must_use]
    pub fn owner_opt(mut self, email: Option<&str>) -> Self {
        self.filter.owner_email = email.map(str::to_owned);
        self
    }

    /// Restrict by completion flag; `None` leaves it open.
    #[must_use]
    pub const fn completed(mut self, completed: Option<bool>) -> Self {
        self.filter.completed = completed;
        self
    }

    /// Restrict by importance flag; `None` leaves it open.
    #[must_use]
    pub const fn important(mut self, important: Option<bool>) -> Self {
        self.filter.important = important;
        self
    }

    /// Restrict to tasks due inside `range`, both ends inclusive.
    #[must_use]
    pub fn due_within(mut self, range: impl Into<DueRange>) -> Self {
        self.filter.due = Some(range.into());
        self
    }

    /// Finish the filter.
    #[must_use]
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldValue;
    use crate::query::FilterOp;

    #[test]
    fn empty_filter_builds_empty_query() {
        let filter = TaskFilter::builder().build();
        assert_eq!(filter, TaskFilter::default());
        assert!(filter.to_query().filters.is_empty());
    }

    #[test]
    fn filters_use_canonical_field_names() {
        let filter = TaskFilter::builder()
            .owner("a@example.com")
            .completed(Some(false))
            .important(Some(true))
            .build();
        let query = filter.to_query();
        let fields: Vec<&str> = query.filters.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "completed", "important"]);
        assert!(query.filters.iter().all(|f| f.op == FilterOp::Eq));
        assert_eq!(query.filters[1].value, FieldValue::Bool(false));
    }

    #[test]
    fn due_range_becomes_two_bounds() {
        let from: Timestamp = "2025-01-01T00:00:00Z"
            .parse()
            .unwrap_or_else(|err| panic!("ts: {err}"));
        let to: Timestamp = "2025-01-01T23:59:59.999Z"
            .parse()
            .unwrap_or_else(|err| panic!("ts: {err}"));
        let query = TaskFilter::builder()
            .due_within(DueRange { from, to })
            .build()
            .to_query();
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].op, FilterOp::Gte);
        assert_eq!(query.filters[1].op, FilterOp::Lte);
        assert!(query.filters.iter().all(|f| f.field == "dueDate"));
    }
}
