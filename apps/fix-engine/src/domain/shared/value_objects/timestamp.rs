//! Timestamp value object for temporal data.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp for domain events, ticks and bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new timestamp from a `DateTime<Utc>`.
    #[must_use]
    pub const fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse from an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid RFC 3339 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Get the Unix timestamp in milliseconds.
    #[must_use]
    pub const fn unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Floor this timestamp to a wall-clock-aligned boundary.
    ///
    /// Used to compute deterministic bar windows: every instance flooring
    /// the same instant with the same period lands on the same boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the duration is zero, negative, or exceeds the
    /// representable range.
    pub fn floor_to(&self, period: Duration) -> Result<Self, chrono::RoundingError> {
        Ok(Self(self.0.duration_trunc(period)?))
    }

    /// Add a duration.
    #[must_use]
    pub fn add(&self, d: Duration) -> Self {
        Self(self.0 + d)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
