//! String pattern detection
//!
//! Recognizes the string shapes the storage-type and cast rules care about:
//! ISO 8601 date-times (with optional fractional seconds and zone suffix),
//! date-only values, email addresses, and UUIDs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A pattern detected in a string sample value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringPattern {
    /// ISO 8601 date-time (`YYYY-MM-DDTHH:MM:SS` plus optional fraction/zone)
    DateTime,
    /// ISO 8601 date (`YYYY-MM-DD`)
    Date,
    /// Email address
    Email,
    /// UUID/GUID
    Uuid,
    /// No recognized pattern
    None,
}

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Detect the pattern of a string value.
///
/// Checks run from most to least specific; UUID before date-time, date-time
/// before date.
pub fn detect_pattern(value: &str) -> StringPattern {
    let value = value.trim();
    if value.is_empty() {
        return StringPattern::None;
    }
    if UUID_REGEX.is_match(value) {
        return StringPattern::Uuid;
    }
    if DATETIME_REGEX.is_match(value) {
        return StringPattern::DateTime;
    }
    if DATE_REGEX.is_match(value) {
        return StringPattern::Date;
    }
    if EMAIL_REGEX.is_match(value) {
        return StringPattern::Email;
    }
    StringPattern::None
}
