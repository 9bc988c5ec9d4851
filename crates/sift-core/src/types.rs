//! Core types for the ingestion engine.
//!
//! This module provides:
//! - [`LogRecord`] — The single normalized shape every parser produces
//! - [`LogRecordBuilder`] — Builder applying the documented field defaults
//! - [`DateRange`] — Inclusive time-window filter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::timestamp::parse_timestamp;

/// Level used when a source record carries none.
pub const DEFAULT_LEVEL: &str = "INFO";
/// User used when a source record carries none.
pub const DEFAULT_USER: &str = "unknown";
/// Address used when a source record carries none.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// A normalized log record.
///
/// Serializes with the same field names the JSON log format uses, so a
/// serialized array of records is itself a valid JSON log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// When the event happened
    #[serde(with = "wire_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Severity label, never empty
    #[serde(rename = "log_level")]
    pub level: String,
    /// Acting user, `user_<id>` for numeric identities
    #[serde(rename = "username")]
    pub user: String,
    /// Source network address
    #[serde(rename = "ip_address")]
    pub address: String,
    /// Free-form message, may be empty
    #[serde(default)]
    pub message: String,
    /// Latency in milliseconds; 0 means "not measured"
    #[serde(rename = "response_time", default)]
    pub response_time_ms: f64,
}

impl LogRecord {
    /// Creates a new record builder.
    #[must_use]
    pub fn builder() -> LogRecordBuilder {
        LogRecordBuilder::default()
    }

    /// Returns true if this record carries a response-time measurement.
    #[must_use]
    pub fn has_response_time(&self) -> bool {
        self.response_time_ms > 0.0
    }
}

/// Renders a numeric user identifier the way textual usernames are stored.
#[must_use]
pub fn user_from_id(id: impl std::fmt::Display) -> String {
    format!("user_{id}")
}

/// Builder for constructing log records.
///
/// Only the timestamp is required. Blank text fields fall back to
/// [`DEFAULT_LEVEL`], [`DEFAULT_USER`] and [`DEFAULT_ADDRESS`].
#[derive(Debug, Default)]
pub struct LogRecordBuilder {
    timestamp: Option<DateTime<Utc>>,
    level: Option<String>,
    user: Option<String>,
    address: Option<String>,
    message: Option<String>,
    response_time_ms: f64,
}

impl LogRecordBuilder {
    /// Sets the timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Sets the user name.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the user from a numeric identifier, rendered as `user_<id>`.
    #[must_use]
    pub fn user_id(mut self, id: impl std::fmt::Display) -> Self {
        self.user = Some(user_from_id(id));
        self
    }

    /// Sets the source address.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the response time in milliseconds.
    ///
    /// Negative and non-finite values are stored as 0 ("not measured").
    #[must_use]
    pub fn response_time_ms(mut self, millis: f64) -> Self {
        self.response_time_ms = if millis.is_finite() && millis > 0.0 {
            millis
        } else {
            0.0
        };
        self
    }

    /// Builds the record, returning an error if the timestamp is missing.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::MissingField`] if no timestamp was set.
    pub fn build(self) -> Result<LogRecord> {
        let timestamp = self
            .timestamp
            .ok_or(SiftError::MissingField("timestamp"))?;

        Ok(LogRecord {
            timestamp,
            level: or_default(self.level, DEFAULT_LEVEL),
            user: or_default(self.user, DEFAULT_USER),
            address: or_default(self.address, DEFAULT_ADDRESS),
            message: self.message.unwrap_or_default(),
            response_time_ms: self.response_time_ms,
        })
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Inclusive time window used to filter records after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start of the range (inclusive)
    pub start: DateTime<Utc>,
    /// End of the range (inclusive)
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a new date range.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidDateRange`] if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(SiftError::InvalidDateRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds a range from two `YYYY-MM-DD HH:MM:SS` strings.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidDateRange`] if either bound fails to parse
    /// or the bounds are inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_timestamp(start)
            .map_err(|e| SiftError::InvalidDateRange(format!("start: {e}")))?;
        let end =
            parse_timestamp(end).map_err(|e| SiftError::InvalidDateRange(format!("end: {e}")))?;
        Self::new(start, end)
    }

    /// Checks if a timestamp falls within this range, bounds included.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Serde adapter for the `YYYY-MM-DD HH:MM:SS` wire layout.
mod wire_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::timestamp::{format_timestamp, parse_timestamp};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(*ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}
