//! Row parsing and SQL building helpers shared by the repos.

use chrono::{DateTime, Utc};
use term_core::enums::VocabularyKind;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER flag column.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_flag(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// `?start, ?start+1, ...` placeholders for an `IN (...)` list of `count` values.
#[must_use]
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Table and representation column of a vocabulary kind.
///
/// Exhaustive so a new kind forces a schema decision here.
#[must_use]
pub const fn vocabulary_table(kind: VocabularyKind) -> (&'static str, &'static str) {
    match kind {
        VocabularyKind::Language => ("languages", "code"),
        VocabularyKind::PartOfSpeech => ("parts_of_speech", "representation"),
        VocabularyKind::GrammaticalGender => ("grammatical_genders", "representation"),
        VocabularyKind::GrammaticalNumber => ("grammatical_numbers", "representation"),
        VocabularyKind::AdministrativeStatus => ("administrative_statuses", "representation"),
        VocabularyKind::AdministrativeStatusReason => {
            ("administrative_status_reasons", "representation")
        }
        VocabularyKind::ExternalLinkType => ("external_link_types", "representation"),
    }
}
