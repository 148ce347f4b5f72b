//! Data models for the catalog

pub mod author;
pub mod author_book;
pub mod book;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorFields, AuthorInput, AuthorSummary};
pub use author_book::SyncPlan;
pub use book::{Book, BookFields, BookIndex, BookWithAuthors, CreateBook, UpdateBook};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

/// Calendar dates as exchanged with clients
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
/// Calendar dates as displayed in listings
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a client date: `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is kept.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, ISO_DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Trims strings and turns blank ones into `None`
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Take a field that passed validation, or report it as required.
pub(crate) fn required<T>(value: Option<T>, field: &str, label: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::invalid_field(field, format!("The {} field is required.", label)))
}

/// Collapse repeated ids, keeping the first occurrence
pub(crate) fn unique_ids(ids: Vec<i64>) -> Vec<i64> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn validate_date(value: &str) -> Result<(), validator::ValidationError> {
    if parse_date(value).is_some() {
        return Ok(());
    }
    Err(validator::ValidationError::new("date"))
}
