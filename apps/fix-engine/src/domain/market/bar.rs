//! OHLCV bars and the specifications that define how they roll up.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::tick::PriceType;
use crate::domain::shared::{DomainError, Price, Symbol, Timestamp, Volume};

/// How ticks are rolled up into bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarAggregation {
    /// Close a bar every N ticks.
    Tick,
    /// N-second wall-clock windows.
    Second,
    /// N-minute wall-clock windows.
    Minute,
    /// N-hour wall-clock windows.
    Hour,
    /// N-day wall-clock windows.
    Day,
}

impl BarAggregation {
    /// Whether bars close on wall-clock boundaries rather than counts.
    #[must_use]
    pub const fn is_time_based(&self) -> bool {
        !matches!(self, Self::Tick)
    }
}

impl fmt::Display for BarAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tick => write!(f, "TICK"),
            Self::Second => write!(f, "SECOND"),
            Self::Minute => write!(f, "MINUTE"),
            Self::Hour => write!(f, "HOUR"),
            Self::Day => write!(f, "DAY"),
        }
    }
}

/// The (period, aggregation, price type) tuple defining a bar series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarSpecification {
    /// Window length: tick count for tick bars, unit count otherwise.
    pub period: u32,
    /// Roll-up structure.
    pub aggregation: BarAggregation,
    /// Side of the book the series is built from.
    pub price_type: PriceType,
}

impl BarSpecification {
    /// Window duration for time-based specifications.
    ///
    /// Returns `None` for tick-count bars, which have no fixed duration.
    #[must_use]
    pub fn timedelta(&self) -> Option<Duration> {
        let period = i64::from(self.period);
        match self.aggregation {
            BarAggregation::Tick => None,
            BarAggregation::Second => Some(Duration::seconds(period)),
            BarAggregation::Minute => Some(Duration::minutes(period)),
            BarAggregation::Hour => Some(Duration::hours(period)),
            BarAggregation::Day => Some(Duration::days(period)),
        }
    }
}

impl fmt::Display for BarSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.period, self.aggregation, self.price_type)
    }
}

/// Aggregation key: a symbol plus the specification of its bar series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarType {
    /// The instrument.
    pub symbol: Symbol,
    /// The series specification.
    pub specification: BarSpecification,
}

impl fmt::Display for BarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.symbol, self.specification)
    }
}

/// An immutable OHLCV snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    volume: Volume,
    timestamp: Timestamp,
}

impl Bar {
    /// Assemble a bar, enforcing the OHLC ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if the high is below any other price or the low
    /// is above any other price.
    pub fn new(
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
        timestamp: Timestamp,
    ) -> Result<Self, DomainError> {
        if high < open || high < low || high < close {
            return Err(DomainError::InvalidValue {
                field: "high".to_string(),
                message: format!("high {high} below another bar price"),
            });
        }
        if low > open || low > close {
            return Err(DomainError::InvalidValue {
                field: "low".to_string(),
                message: format!("low {low} above another bar price"),
            });
        }
        Ok(Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        })
    }

    /// Opening price.
    #[must_use]
    pub const fn open(&self) -> Price {
        self.open
    }

    /// Highest price.
    #[must_use]
    pub const fn high(&self) -> Price {
        self.high
    }

    /// Lowest price.
    #[must_use]
    pub const fn low(&self) -> Price {
        self.low
    }

    /// Closing price.
    #[must_use]
    pub const fn close(&self) -> Price {
        self.close
    }

    /// Accumulated volume.
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    /// Close timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "O={} H={} L={} C={} V={} @ {}",
            self.open, self.high, self.low, self.close, self.volume, self.timestamp
        )
    }
}
