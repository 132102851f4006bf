//! Timestamp utilities
//!
//! Timestamps are stored as RFC 3339 text with a fixed microsecond width,
//! so lexicographic order in SQLite equals chronological order.

use chrono::{DateTime, Local, SecondsFormat, Utc};

use crate::{Error, Result};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp for storage in a TEXT column
pub fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time formatted for storage
pub fn now_db_timestamp() -> String {
    to_db_timestamp(&now())
}

/// Parse a stored timestamp
pub fn parse_db_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp '{}': {}", value, e)))
}

/// Local-time stamp used in export file names, e.g. `2026-10-16_1405`
pub fn export_stamp(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m-%d_%H%M").to_string()
}
