//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC timestamp truncated to seconds precision.
//! Every date written into a credential document (issuance, validity,
//! awarding date) goes through this type, so all of them share one
//! rendering: `YYYY-MM-DDTHH:MM:SS+00:00`.
//!
//! Caller-supplied dates (the `expires_at` query parameter) are parsed
//! with [`Timestamp::parse_flexible`], which accepts the common ISO 8601
//! variants and Unix seconds and normalises them to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_utc()`]: from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse_flexible()`]: from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse caller-supplied date input.
    ///
    /// Accepted, in order of preference:
    ///
    /// - RFC 3339 with any offset (`2021-01-01T00:00:00+02:00`), converted to UTC;
    /// - naive date-time (`2021-01-01T00:00:00` or with a space separator), taken as UTC;
    /// - date only (`2021-01-01`), midnight UTC;
    /// - integer Unix seconds (`1609459200`).
    pub fn parse_flexible(s: &str) -> Result<Self, CoreError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CoreError::InvalidTimestamp("empty input".into()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::from_utc(dt.with_timezone(&Utc)));
        }

        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }

        if let Ok(secs) = s.parse::<i64>() {
            return Self::from_epoch_secs(secs);
        }

        Err(CoreError::InvalidTimestamp(format!(
            "{s:?} is not a valid datetime"
        )))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("invalid Unix timestamp: {secs}")))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with an explicit UTC offset (e.g., `2024-01-01T01:02:03+00:00`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 1, 2, 3).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2024-01-01T01:02:03+00:00");
    }

    #[test]
    fn test_display_matches_iso8601() {
        let ts = Timestamp::from_utc(Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap());
        assert_eq!(format!("{ts}"), "2026-06-30T23:59:59+00:00");
    }

    #[test]
    fn test_parse_rfc3339_utc() {
        let ts = Timestamp::parse_flexible("2021-01-01T00:00:00+00:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2021-01-01T00:00:00+00:00");
        let z = Timestamp::parse_flexible("2021-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, z);
    }

    #[test]
    fn test_parse_offset_is_normalised() {
        let ts = Timestamp::parse_flexible("2021-01-01T05:30:00+05:30").unwrap();
        assert_eq!(ts.to_iso8601(), "2021-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        let naive = Timestamp::parse_flexible("2021-03-04T10:11:12").unwrap();
        assert_eq!(naive.to_iso8601(), "2021-03-04T10:11:12+00:00");
        let spaced = Timestamp::parse_flexible("2021-03-04 10:11:12").unwrap();
        assert_eq!(naive, spaced);
        let date = Timestamp::parse_flexible("2021-03-04").unwrap();
        assert_eq!(date.to_iso8601(), "2021-03-04T00:00:00+00:00");
    }

    #[test]
    fn test_parse_epoch_seconds() {
        let ts = Timestamp::parse_flexible("1609459200").unwrap();
        assert_eq!(ts.to_iso8601(), "2021-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Timestamp::parse_flexible("25-25-25").is_err());
        assert!(Timestamp::parse_flexible("not-a-date").is_err());
        assert!(Timestamp::parse_flexible("2021-13-01").is_err());
        assert!(Timestamp::parse_flexible("").is_err());
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse_flexible("2026-01-15T12:00:00Z").unwrap();
        let later = Timestamp::parse_flexible("2026-01-15T12:00:01Z").unwrap();
        assert!(earlier < later);
    }
}
