//! Parsing of user-facing filter and date tokens.

use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{Timestamp, ToSpan};
use tasklane_core::TaskFilter;
use thiserror::Error;

/// Error type returned while constructing task filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// Unknown status token.
    #[error("invalid status: {token} (expected all, active or completed)")]
    InvalidStatus {
        /// Token as given.
        token: String,
    },
    /// Token is neither a boolean nor `any`.
    #[error("invalid {field} flag: {token}")]
    InvalidFlag {
        /// Flag being parsed.
        field: &'static str,
        /// Token as given.
        token: String,
    },
    /// Token matches no accepted date form.
    #[error("invalid due date: {token}")]
    InvalidDueDate {
        /// Token as given.
        token: String,
        /// Parse failure of the last form tried.
        #[source]
        source: Option<jiff::Error>,
    },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Completion status selector used by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Completed and active tasks.
    #[default]
    All,
    /// Tasks not yet completed.
    Active,
    /// Completed tasks only.
    Completed,
}

impl StatusFilter {
    /// Completion criterion for [`TaskFilter::completed`].
    #[must_use]
    pub const fn completed(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(false),
            Self::Completed => Some(true),
        }
    }
}

/// Parse a status token (`all`, `active`/`pending`, `completed`/`done`).
///
/// # Errors
/// Returns an error for unknown tokens.
pub fn parse_status(token: &str) -> FilterBuildResult<StatusFilter> {
    match token.trim().to_ascii_lowercase().as_str() {
        "all" | "" => Ok(StatusFilter::All),
        "active" | "pending" | "open" => Ok(StatusFilter::Active),
        "completed" | "done" => Ok(StatusFilter::Completed),
        _ => Err(FilterBuildError::InvalidStatus {
            token: token.to_owned(),
        }),
    }
}

/// Parse a tri-state flag; `any` (or blank) means unconstrained.
///
/// # Errors
/// Returns an error for tokens that are neither boolean nor `any`.
pub fn parse_flag(field: &'static str, token: &str) -> FilterBuildResult<Option<bool>> {
    match token.trim().to_ascii_lowercase().as_str() {
        "" | "any" => Ok(None),
        "true" | "yes" | "y" | "1" => Ok(Some(true)),
        "false" | "no" | "n" | "0" => Ok(Some(false)),
        _ => Err(FilterBuildError::InvalidFlag {
            field,
            token: token.to_owned(),
        }),
    }
}

/// Parse a due-date token into an instant.
///
/// Accepts `today`, `tomorrow`, RFC 3339 instants, civil date-times
/// (`2025-03-01T09:30`) and bare dates (`2025-03-01`, meaning local
/// midnight) interpreted in `tz`.
///
/// # Errors
/// Returns an error when the token matches none of the accepted forms.
pub fn parse_due_date(token: &str, now: Timestamp, tz: &TimeZone) -> FilterBuildResult<Timestamp> {
    let trimmed = token.trim();
    let invalid = |source: Option<jiff::Error>| FilterBuildError::InvalidDueDate {
        token: token.to_owned(),
        source,
    };

    match trimmed.to_ascii_lowercase().as_str() {
        "today" | "now" => return Ok(now),
        "tomorrow" => {
            return now
                .to_zoned(tz.clone())
                .checked_add(1.day())
                .map(|zoned| zoned.timestamp())
                .map_err(|err| invalid(Some(err)));
        }
        _ => {}
    }

    if let Ok(instant) = trimmed.parse::<Timestamp>() {
        return Ok(instant);
    }
    if let Ok(datetime) = trimmed.parse::<DateTime>() {
        return datetime
            .to_zoned(tz.clone())
            .map(|zoned| zoned.timestamp())
            .map_err(|err| invalid(Some(err)));
    }
    match trimmed.parse::<Date>() {
        Ok(date) => date
            .to_zoned(tz.clone())
            .map(|zoned| zoned.timestamp())
            .map_err(|err| invalid(Some(err))),
        Err(err) => Err(invalid(Some(err))),
    }
}

/// Build the filter used by list views.
#[must_use]
pub fn list_filter(owner_email: Option<&str>, status: StatusFilter, important: Option<bool>) -> TaskFilter {
    TaskFilter::builder()
        .owner_opt(owner_email)
        .completed(status.completed())
        .important(important)
        .build()
}
