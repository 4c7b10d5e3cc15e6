//! Publication date normalization.
//!
//! Every timestamp ends up as `Option<DateTime<Utc>>`. Naive values are
//! assumed to be UTC, aware values are converted to UTC, and anything that
//! cannot be parsed becomes `None`. `Option`'s ordering puts `None` before
//! every instant, which is the "earliest" sentinel the storyline ordering
//! relies on.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

use crate::types::PublishedAt;

type Strategy = fn(&str) -> Option<DateTime<Utc>>;

/// String parse strategies, tried in order. The first success wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("rfc3339", parse_rfc3339),
    ("iso_offset", parse_iso_with_offset),
    ("naive_datetime", parse_naive_datetime),
    ("naive_minutes", parse_naive_minutes),
    ("date", parse_date),
];

/// Normalize an optional raw publication value to a UTC instant.
pub fn normalize_published(value: Option<&PublishedAt>) -> Option<DateTime<Utc>> {
    match value? {
        PublishedAt::Instant(dt) => Some(dt.with_timezone(&Utc)),
        PublishedAt::Naive(dt) => Some(dt.and_utc()),
        PublishedAt::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        PublishedAt::Text(s) => parse_timestamp(s),
    }
}

/// Parse an ISO-8601 timestamp or a bare `YYYY-MM-DD` date.
///
/// A trailing `Z` is the UTC offset. Returns `None` for any other format.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    for (name, strategy) in STRATEGIES {
        if let Some(dt) = strategy(s) {
            trace!(input = s, strategy = name, "Parsed timestamp");
            return Some(dt);
        }
    }
    trace!(input = s, "Unparseable timestamp");
    None
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// Offsets without a colon (`+0200`) are valid ISO-8601 but not RFC 3339.
fn parse_iso_with_offset(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive_datetime(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|dt| dt.and_utc())
}

fn parse_naive_minutes(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .ok()
        .map(|dt| dt.and_utc())
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
