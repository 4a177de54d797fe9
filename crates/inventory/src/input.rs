//! Entry-time parsing of operator-supplied text.
//!
//! Every helper trims surrounding whitespace and reports problems as
//! [`DomainError::InvalidInput`] so the caller can abort the single operation
//! without touching the log.

use chrono::NaiveDate;

use milkstock_core::{DomainError, DomainResult};

use crate::movement::DATE_FORMAT;

/// Parse a required non-negative integer field.
pub fn parse_required_int(field: &str, raw: &str) -> DomainResult<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::invalid_input(format!("{field} is required")));
    }
    raw.parse::<u32>()
        .map_err(|_| DomainError::invalid_input(format!("{field} must be a whole number, got '{raw}'")))
}

/// Parse an integer field, falling back to `default` when left blank.
pub fn parse_int_or(field: &str, raw: &str, default: u32) -> DomainResult<u32> {
    if raw.trim().is_empty() {
        return Ok(default);
    }
    parse_required_int(field, raw)
}

/// Parse a `YYYY-MM-DD` date, falling back to `default` when left blank.
pub fn parse_date_or(field: &str, raw: &str, default: NaiveDate) -> DomainResult<NaiveDate> {
    Ok(parse_optional_date(field, raw)?.unwrap_or(default))
}

/// Parse an optional `YYYY-MM-DD` date; blank means "not set".
pub fn parse_optional_date(field: &str, raw: &str) -> DomainResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| DomainError::invalid_input(format!("{field} must be a YYYY-MM-DD date, got '{raw}'")))
}

/// Free text with surrounding whitespace removed, or `default` when blank.
pub fn text_or(raw: &str, default: &str) -> String {
    match raw.trim() {
        "" => default.to_string(),
        s => s.to_string(),
    }
}
