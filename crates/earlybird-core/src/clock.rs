//! Instant normalization.
//!
//! Everything downstream compares [`Instant`] values only, so a date string is
//! parsed once at the edge and never again. Strings without an offset are read
//! as UTC.

use std::fmt;
use std::ops::{Add, Sub};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EngineError;

/// Offset-less date-time layouts accepted after RFC 3339 fails.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A point in time as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant(i64);

impl Instant {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Current wall-clock time. Only outer layers call this; engine
    /// operations always take "now" as an argument.
    pub fn now() -> Self {
        Utc::now().into()
    }

    /// `None` when the instant lies outside chrono's representable range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

/// Milliseconds between two instants (saturating).
impl Sub for Instant {
    type Output = i64;

    fn sub(self, rhs: Instant) -> i64 {
        self.0.saturating_sub(rhs.0)
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        Instant(self.0.saturating_add(rhs.num_milliseconds()))
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        Instant(self.0.saturating_sub(rhs.num_milliseconds()))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Instant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_datetime() {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_i64(self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Millis(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Millis(ms) => Ok(Instant(ms)),
            Repr::Text(s) => to_instant(s.as_str()).map_err(serde::de::Error::custom),
        }
    }
}

/// Either an already-normalized instant or an ISO-8601 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLike<'a> {
    Instant(Instant),
    Text(&'a str),
}

impl From<Instant> for DateLike<'_> {
    fn from(instant: Instant) -> Self {
        DateLike::Instant(instant)
    }
}

impl From<DateTime<Utc>> for DateLike<'_> {
    fn from(dt: DateTime<Utc>) -> Self {
        DateLike::Instant(dt.into())
    }
}

impl<'a> From<&'a str> for DateLike<'a> {
    fn from(s: &'a str) -> Self {
        DateLike::Text(s)
    }
}

impl<'a> From<&'a String> for DateLike<'a> {
    fn from(s: &'a String) -> Self {
        DateLike::Text(s.as_str())
    }
}

/// Normalize a date-like value into an [`Instant`].
///
/// Accepts RFC 3339 (any offset, converted to UTC), offset-less date-times
/// and bare `YYYY-MM-DD` dates (UTC midnight).
///
/// # Errors
///
/// Returns [`EngineError::InvalidDate`] when the string is not a valid
/// calendar date in one of the accepted layouts.
pub fn to_instant<'a>(value: impl Into<DateLike<'a>>) -> Result<Instant, EngineError> {
    match value.into() {
        DateLike::Instant(instant) => Ok(instant),
        DateLike::Text(text) => parse_iso(text)
            .map(Instant::from)
            .ok_or_else(|| EngineError::InvalidDate {
                input: text.to_string(),
            }),
    }
}

fn parse_iso(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
