//! Input validation shared by payloads and the agenda overlap check.
//!
//! Everything here runs before the database is touched, so a
//! [`ValidationError`] never leaves partial state behind.

use thiserror::Error;

/// Rejection raised before any persistence call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("{field} is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("day {day}, window {window}: startTime and endTime cannot be empty")]
    EmptyTime { day: usize, window: usize },

    #[error("day {day}, window {window}: endTime {end} must be greater than startTime {start}")]
    EndNotAfterStart {
        day: usize,
        window: usize,
        start: String,
        end: String,
    },

    #[error(
        "day {day}, window {window}: startTime {start} must be greater than endTime {previous_end} of window {previous}"
    )]
    Overlap {
        day: usize,
        window: usize,
        previous: usize,
        start: String,
        previous_end: String,
    },
}

/// Reject blank values.
pub fn require(value: &str, field: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Require an ISO calendar date (`YYYY-MM-DD`).
pub fn require_date(value: &str, field: &str) -> Result<(), ValidationError> {
    require(value, field)?;
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidField {
            field: field.to_string(),
            reason: e.to_string(),
        })
}
