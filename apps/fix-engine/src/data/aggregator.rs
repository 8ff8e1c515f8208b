//! Tick-to-bar aggregation.
//!
//! One aggregator per subscribed bar type. Time-based aggregators close
//! on wall-clock-aligned boundaries so independently started instances
//! produce identical bars; tick-count aggregators close every N quotes.

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

use super::builder::BarBuilder;
use crate::domain::market::{Bar, BarAggregation, BarType, QuoteTick};
use crate::domain::shared::Timestamp;

/// Aggregator construction failures.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// A time aggregator was asked to handle a tick-count specification,
    /// or vice versa.
    #[error("specification {spec} does not match aggregator kind")]
    SpecMismatch {
        /// Display form of the offending specification.
        spec: String,
    },
    /// The specification's period is zero.
    #[error("bar specification period must be positive")]
    ZeroPeriod,
}

/// Either aggregator kind, keyed by specification in the controller.
#[derive(Debug)]
pub enum BarAggregator {
    /// Wall-clock-window aggregation.
    Time(TimeBarAggregator),
    /// Tick-count aggregation.
    Tick(TickBarAggregator),
}

impl BarAggregator {
    /// Build the right aggregator kind for the bar type.
    ///
    /// # Errors
    ///
    /// Returns an error if the specification period is zero.
    pub fn for_bar_type(bar_type: BarType) -> Result<Self, AggregationError> {
        if bar_type.specification.aggregation == BarAggregation::Tick {
            Ok(Self::Tick(TickBarAggregator::new(bar_type)?))
        } else {
            Ok(Self::Time(TimeBarAggregator::new(bar_type)?))
        }
    }

    /// Fold one tick in; returns the closed bar when a window completes.
    pub fn on_tick(&mut self, tick: &QuoteTick) -> Option<Bar> {
        match self {
            Self::Time(agg) => agg.on_tick(tick),
            Self::Tick(agg) => agg.on_tick(tick),
        }
    }

    /// The bar type this aggregator produces.
    #[must_use]
    pub const fn bar_type(&self) -> &BarType {
        match self {
            Self::Time(agg) => &agg.bar_type,
            Self::Tick(agg) => &agg.bar_type,
        }
    }
}

/// Closes bars on UTC wall-clock boundaries divisible by the period.
///
/// The window end is derived from the tick timestamp, never from the
/// first tick's arrival, so two instances fed the same stream emit
/// bars with identical close timestamps.
#[derive(Debug)]
pub struct TimeBarAggregator {
    bar_type: BarType,
    timedelta: Duration,
    builder: BarBuilder,
    window_end: Option<Timestamp>,
}

impl TimeBarAggregator {
    /// Create an aggregator for a time-based bar type.
    ///
    /// # Errors
    ///
    /// Returns an error for a tick-count specification or a zero period.
    pub fn new(bar_type: BarType) -> Result<Self, AggregationError> {
        if bar_type.specification.period == 0 {
            return Err(AggregationError::ZeroPeriod);
        }
        let timedelta =
            bar_type
                .specification
                .timedelta()
                .ok_or_else(|| AggregationError::SpecMismatch {
                    spec: bar_type.specification.to_string(),
                })?;
        Ok(Self {
            bar_type,
            timedelta,
            builder: BarBuilder::new(),
            window_end: None,
        })
    }

    /// Fold one tick in; returns the closed bar when the tick reaches or
    /// passes the current window end.
    pub fn on_tick(&mut self, tick: &QuoteTick) -> Option<Bar> {
        let price_type = self.bar_type.specification.price_type;
        let (price, size) = match (tick.extract(price_type), tick.extract_size(price_type)) {
            (Ok(price), Ok(size)) => (price, size),
            (Err(error), _) | (_, Err(error)) => {
                warn!(bar_type = %self.bar_type, %error, "dropping tick");
                return None;
            }
        };

        let Some(window_end) = self.window_end else {
            match self.next_window_end(tick.timestamp) {
                Some(end) => self.window_end = Some(end),
                None => return None,
            }
            self.builder.update(price, size, tick.timestamp);
            return None;
        };

        if tick.timestamp >= window_end {
            let closed = match self.builder.build(window_end) {
                Ok(bar) => Some(bar),
                Err(error) => {
                    warn!(bar_type = %self.bar_type, %error, "discarding window");
                    None
                }
            };
            self.builder = BarBuilder::seeded(price, size, tick.timestamp);
            self.window_end = self.next_window_end(tick.timestamp);
            return closed;
        }

        self.builder.update(price, size, tick.timestamp);
        None
    }

    fn next_window_end(&self, timestamp: Timestamp) -> Option<Timestamp> {
        match timestamp.floor_to(self.timedelta) {
            Ok(floored) => Some(floored.add(self.timedelta)),
            Err(error) => {
                warn!(bar_type = %self.bar_type, %error, "cannot align bar window");
                None
            }
        }
    }
}

/// Closes a bar once the builder holds N quotes.
#[derive(Debug)]
pub struct TickBarAggregator {
    bar_type: BarType,
    period: usize,
    builder: BarBuilder,
}

impl TickBarAggregator {
    /// Create an aggregator for a tick-count bar type.
    ///
    /// # Errors
    ///
    /// Returns an error for a time-based specification or a zero period.
    pub fn new(bar_type: BarType) -> Result<Self, AggregationError> {
        if bar_type.specification.aggregation != BarAggregation::Tick {
            return Err(AggregationError::SpecMismatch {
                spec: bar_type.specification.to_string(),
            });
        }
        if bar_type.specification.period == 0 {
            return Err(AggregationError::ZeroPeriod);
        }
        Ok(Self {
            period: bar_type.specification.period as usize,
            bar_type,
            builder: BarBuilder::new(),
        })
    }

    /// Fold one tick in; returns the closed bar on every Nth quote.
    pub fn on_tick(&mut self, tick: &QuoteTick) -> Option<Bar> {
        let price_type = self.bar_type.specification.price_type;
        let (price, size) = match (tick.extract(price_type), tick.extract_size(price_type)) {
            (Ok(price), Ok(size)) => (price, size),
            (Err(error), _) | (_, Err(error)) => {
                warn!(bar_type = %self.bar_type, %error, "dropping tick");
                return None;
            }
        };

        self.builder.update(price, size, tick.timestamp);
        if self.builder.count() < self.period {
            return None;
        }

        let closed = match self.builder.build(tick.timestamp) {
            Ok(bar) => Some(bar),
            Err(error) => {
                warn!(bar_type = %self.bar_type, %error, "discarding window");
                None
            }
        };
        self.builder = BarBuilder::seeded(price, size, tick.timestamp);
        closed
    }
}
