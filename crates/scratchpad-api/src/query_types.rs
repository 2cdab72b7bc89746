//! Lenient query parameter parsing.
//!
//! Browser forms and HTTP clients send every query value as a string, often
//! empty. Parameters are therefore deserialized as raw strings and converted
//! here: a malformed number falls back to the default and a malformed
//! optional date is treated as absent. The MCP tools use [`parse_date`]
//! directly and surface its error to the caller instead.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a boundary date.
///
/// Accepts:
/// - RFC 3339 with timezone: `2026-01-15T10:30:00Z`
/// - RFC 3339 with offset: `2026-01-15T10:30:00+05:00`
/// - ISO 8601 without timezone (assumes UTC): `2026-01-15T10:30:00`
/// - The same with fractional seconds: `2026-01-15T10:30:00.123`
/// - Date only (assumes midnight UTC): `2026-01-15`
/// - Space instead of `T`: `2026-01-15 10:30:00Z`
pub fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("date value cannot be empty".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|n| n.and_utc())
            .ok_or_else(|| "failed to create datetime from date".to_string());
    }

    let normalized = s.replacen(' ', "T", 1);
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }

    Err(format!(
        "invalid date '{}', expected YYYY-MM-DD or RFC 3339 \
        (e.g. '2026-01-15' or '2026-01-15T10:30:00Z')",
        s
    ))
}

/// Parse an optional date, ignoring blank or malformed input.
pub fn lenient_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.filter(|s| !s.trim().is_empty())
        .and_then(|s| parse_date(s).ok())
}

/// Parse an optional integer, substituting `default` for blank or malformed input.
pub fn lenient_int(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
