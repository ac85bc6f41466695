//! Currency and date normalization.
//!
//! Pure functions converting the textual forms used by the seed CSV and
//! the operator prompts into canonical internal values (integer cents,
//! `NaiveDateTime`) and back for display. Monetary values are never kept
//! as floating point past the parse step.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Date pattern used by the seed CSV (`date_updated` column), no time part.
pub const SEED_DATE_PATTERN: &str = "%m/%d/%Y";

/// Timestamp pattern used in the database and in backup files.
pub const STORED_TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a dollar amount into integer cents.
///
/// Strips one leading `$`, parses the remainder as a decimal number,
/// multiplies by 100 and rounds to the nearest cent. Negative amounts
/// are rejected.
pub fn parse_price(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let dollars: f64 = body
        .parse()
        .map_err(|_| Error::Format(format!("not a valid price: '{}'", text)))?;
    if !dollars.is_finite() || dollars < 0.0 {
        return Err(Error::Format(format!(
            "price must be a non-negative amount: '{}'",
            text
        )));
    }
    Ok((dollars * 100.0).round() as i64)
}

/// Reads a price field from a bulk row.
///
/// Seed files carry dollar amounts (`$3.50`); backup files carry raw
/// integer cents. A leading `$` or a decimal point marks a dollar
/// amount, a bare integer is taken as cents. This is what lets an
/// exported backup be re-imported without changing any value.
pub fn parse_price_field(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.starts_with('$') || trimmed.contains('.') {
        return parse_price(trimmed);
    }
    let cents: i64 = trimmed
        .parse()
        .map_err(|_| Error::Format(format!("not a valid price: '{}'", text)))?;
    if cents < 0 {
        return Err(Error::Format(format!(
            "price must be a non-negative amount: '{}'",
            text
        )));
    }
    Ok(cents)
}

/// Parses a stock quantity. Negative or non-numeric text is rejected.
pub fn parse_quantity(text: &str) -> Result<i64> {
    let quantity: u32 = text
        .trim()
        .parse()
        .map_err(|_| Error::Format(format!("not a valid quantity: '{}'", text)))?;
    Ok(i64::from(quantity))
}

/// Parses a date-only value against an expected pattern, at midnight.
pub fn parse_date(text: &str, pattern: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(text.trim(), pattern).map_err(|_| {
        Error::Format(format!("date '{}' does not match pattern {}", text, pattern))
    })?;
    Ok(date.and_time(NaiveTime::MIN))
}

/// Reads a `date_updated` field from a bulk row.
///
/// Tries the seed pattern (`%m/%d/%Y`, midnight) first, then the stored
/// rendering written by backups (`%Y-%m-%d %H:%M:%S`).
pub fn parse_timestamp_field(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    if let Ok(stamp) = parse_date(trimmed, SEED_DATE_PATTERN) {
        return Ok(stamp);
    }
    NaiveDateTime::parse_from_str(trimmed, STORED_TIMESTAMP_PATTERN)
        .map_err(|_| Error::Format(format!("not a recognized date: '{}'", text)))
}

/// Renders cents as a dollar string with two decimal places, display only.
pub fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
