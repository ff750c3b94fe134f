#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident status taxonomy and incident log entry types.
//!
//! The incident log is a journal of user-declared events, not a ticket
//! tracker: every action ("call placed", "resolved") becomes a new
//! [`LogEntry`] and existing entries are never transitioned or edited.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Location marker recorded when the report came from the GPS option
/// rather than a named campus location.
pub const GPS_LOCATION: &str = "GPS";

/// Timestamp layout used in the persisted log (ISO-8601, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Status of a reported incident event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    /// The fire station was dialled and the call logged.
    CallPlaced,
    /// Responders arrived and the incident was marked resolved.
    Resolved,
}

impl IncidentStatus {
    /// Parses a persisted or user-supplied status string
    /// (e.g. `"CALL_PLACED"`).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStatusError`] if the text is not a known status.
    pub fn parse(value: &str) -> Result<Self, InvalidStatusError> {
        Self::from_str(value.trim()).map_err(|_| InvalidStatusError {
            value: value.to_string(),
        })
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::CallPlaced, Self::Resolved]
    }
}

/// Error returned when a status string does not name an [`IncidentStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatusError {
    /// The rejected status text.
    pub value: String,
}

impl std::fmt::Display for InvalidStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid incident status '{}': expected CALL_PLACED or RESOLVED",
            self.value
        )
    }
}

impl std::error::Error for InvalidStatusError {}

/// One timestamped record in the incident log.
///
/// Field order matches the persisted CSV header
/// (`timestamp,status,location,notes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local time the event was logged, truncated to whole seconds.
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    /// What happened.
    pub status: IncidentStatus,
    /// Campus location name, or [`GPS_LOCATION`].
    pub location: String,
    /// Free-form notes. Empty when none were given.
    #[serde(default)]
    pub notes: String,
}

impl LogEntry {
    /// Whether the event was reported from the GPS option.
    #[must_use]
    pub fn is_gps(&self) -> bool {
        self.location == GPS_LOCATION
    }

    /// Returns the timestamp in the persisted ISO-8601 layout.
    #[must_use]
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Serde adapter for log timestamps.
///
/// Writes `YYYY-MM-DDTHH:MM:SS`. Reads that layout with optional fractional
/// seconds, or a space instead of the `T` separator.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    /// Serializes a timestamp in [`TIMESTAMP_FORMAT`].
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    /// Deserializes a timestamp written by [`serialize`] or a close variant.
    ///
    /// # Errors
    ///
    /// Returns a custom error if the text is not a recognised timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{s}'")))
    }

    /// Parses a log timestamp string.
    #[must_use]
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(ts);
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
            return Some(ts);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(IncidentStatus::CallPlaced.to_string(), "CALL_PLACED");
        assert_eq!(IncidentStatus::Resolved.as_ref(), "RESOLVED");
        assert_eq!(
            IncidentStatus::parse("CALL_PLACED").unwrap(),
            IncidentStatus::CallPlaced
        );
        assert_eq!(
            IncidentStatus::parse(" RESOLVED ").unwrap(),
            IncidentStatus::Resolved
        );
    }

    #[test]
    fn rejects_unknown_status() {
        let err = IncidentStatus::parse("ESCALATED").unwrap_err();
        assert_eq!(err.value, "ESCALATED");
        assert!(err.to_string().contains("ESCALATED"));
    }

    #[test]
    fn parses_timestamps_with_and_without_t_separator() {
        let a = timestamp_format::parse("2025-06-01T09:15:30").unwrap();
        let b = timestamp_format::parse("2025-06-01 09:15:30").unwrap();
        assert_eq!(a, b);
        assert!(timestamp_format::parse("2025-06-01T09:15:30.250").is_some());
        assert!(timestamp_format::parse("yesterday").is_none());
    }

    #[test]
    fn gps_marker_detected() {
        let entry = LogEntry {
            timestamp: timestamp_format::parse("2025-06-01T09:15:30").unwrap(),
            status: IncidentStatus::CallPlaced,
            location: GPS_LOCATION.to_string(),
            notes: String::new(),
        };
        assert!(entry.is_gps());
        assert_eq!(entry.timestamp_string(), "2025-06-01T09:15:30");
    }
}
