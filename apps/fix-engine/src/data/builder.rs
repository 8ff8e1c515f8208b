//! Incremental OHLCV accumulation.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::market::Bar;
use crate::domain::shared::{DomainError, Price, Timestamp, Volume};

/// Why a bar could not be built.
#[derive(Debug, Error)]
pub enum BarBuildError {
    /// No quotes have been accumulated since the last reset.
    #[error("cannot build a bar from an empty builder")]
    Empty,
    /// The accumulated values violate a bar invariant.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone)]
struct Accumulator {
    open: Price,
    high: Price,
    low: Price,
    close: Price,
    last_update: Timestamp,
}

/// Stateful OHLCV accumulator: empty until the first quote, then
/// accumulating until the owning aggregator replaces it.
///
/// `build` is a pure snapshot; resetting is the aggregator's job.
#[derive(Debug, Clone, Default)]
pub struct BarBuilder {
    accumulator: Option<Accumulator>,
    volume: Decimal,
    volume_precision: u32,
    count: usize,
}

impl BarBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-seeded with one quote.
    #[must_use]
    pub fn seeded(price: Price, size: Volume, timestamp: Timestamp) -> Self {
        let mut builder = Self::new();
        builder.update(price, size, timestamp);
        builder
    }

    /// Fold one quote into the accumulator.
    pub fn update(&mut self, price: Price, size: Volume, timestamp: Timestamp) {
        match &mut self.accumulator {
            None => {
                self.accumulator = Some(Accumulator {
                    open: price,
                    high: price,
                    low: price,
                    close: price,
                    last_update: timestamp,
                });
            }
            Some(acc) => {
                if price > acc.high {
                    acc.high = price;
                }
                if price < acc.low {
                    acc.low = price;
                }
                acc.close = price;
                acc.last_update = timestamp;
            }
        }
        self.volume += size.value();
        self.volume_precision = self.volume_precision.max(size.precision());
        self.count += 1;
    }

    /// True until the first quote arrives.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.accumulator.is_none()
    }

    /// Number of quotes folded in.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Timestamp of the most recent quote, if any.
    #[must_use]
    pub fn last_update(&self) -> Option<Timestamp> {
        self.accumulator.as_ref().map(|acc| acc.last_update)
    }

    /// Snapshot the accumulated state into a bar closing at `close_time`.
    ///
    /// Does not reset the builder.
    ///
    /// # Errors
    ///
    /// Returns [`BarBuildError::Empty`] if no quote has been folded in.
    pub fn build(&self, close_time: Timestamp) -> Result<Bar, BarBuildError> {
        let acc = self.accumulator.as_ref().ok_or(BarBuildError::Empty)?;
        let volume = Volume::new(self.volume, self.volume_precision)?;
        Ok(Bar::new(
            acc.open, acc.high, acc.low, acc.close, volume, close_time,
        )?)
    }
}
