//! Lenient timestamp deserialization.
//!
//! Most endpoints send RFC 3339 (`2025-03-01T10:00:00.000000Z`), a few send
//! MySQL-style `2025-03-01 10:00:00`. Both are read as UTC.
//!
//! Use with `#[serde(deserialize_with = "timestamp::deserialize")]` or
//! `timestamp::deserialize_option` for nullable fields.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp in either supported format.
#[must_use]
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Deserialize a required timestamp.
///
/// # Errors
///
/// Returns an error if the value is not a string in a supported format.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Deserialize a nullable timestamp.
///
/// # Errors
///
/// Returns an error if a non-null value is not in a supported format.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|raw| {
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    })
    .transpose()
}
