//! Quote ticks and the price types derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::{DomainError, Price, Quantity, Symbol, Timestamp, Volume};

/// Which side of the book a bar series is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    /// Best bid.
    Bid,
    /// Best ask.
    Ask,
    /// Midpoint of bid and ask.
    Mid,
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Ask => write!(f, "ASK"),
            Self::Mid => write!(f, "MID"),
        }
    }
}

/// A single bid/ask observation for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTick {
    /// Quoted symbol.
    pub symbol: Symbol,
    /// Best bid price.
    pub bid: Price,
    /// Best ask price.
    pub ask: Price,
    /// Size available at the bid.
    pub bid_size: Quantity,
    /// Size available at the ask.
    pub ask_size: Quantity,
    /// When the quote was observed.
    pub timestamp: Timestamp,
}

impl QuoteTick {
    /// Extract the price for the given price type.
    ///
    /// The mid price is `(bid + ask) / 2`, carried at one decimal place
    /// more than the wider of the two quoted precisions so the midpoint
    /// of adjacent quotes survives rounding.
    ///
    /// # Errors
    ///
    /// Returns an error if the computed mid is negative, which cannot
    /// happen for well-formed quotes.
    pub fn extract(&self, price_type: PriceType) -> Result<Price, DomainError> {
        match price_type {
            PriceType::Bid => Ok(self.bid),
            PriceType::Ask => Ok(self.ask),
            PriceType::Mid => {
                let precision = self.bid.precision().max(self.ask.precision()) + 1;
                let mid = (self.bid.value() + self.ask.value()) / rust_decimal::Decimal::TWO;
                Price::new(mid, precision)
            }
        }
    }

    /// Extract the quoted size for the given price type.
    ///
    /// The mid size averages both sides, at one decimal place more than
    /// the wider of the two quoted precisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the averaged size is negative, which cannot
    /// happen for well-formed quotes.
    pub fn extract_size(&self, price_type: PriceType) -> Result<Volume, DomainError> {
        match price_type {
            PriceType::Bid => Volume::new(self.bid_size.value(), self.bid_size.precision()),
            PriceType::Ask => Volume::new(self.ask_size.value(), self.ask_size.precision()),
            PriceType::Mid => {
                let precision = self.bid_size.precision().max(self.ask_size.precision()) + 1;
                let mid = (self.bid_size.value() + self.ask_size.value())
                    / rust_decimal::Decimal::TWO;
                Volume::new(mid, precision)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tick(bid: &str, ask: &str) -> QuoteTick {
        QuoteTick {
            symbol: Symbol::new("AUDUSD"),
            bid: Price::parse(bid).unwrap(),
            ask: Price::parse(ask).unwrap(),
            bid_size: Quantity::from_units(1_000_000),
            ask_size: Quantity::from_units(1_000_000),
            timestamp: Timestamp::now(),
        }
    }

    #[test]
    fn extract_bid_and_ask() {
        let t = tick("1.00010", "1.00030");
        assert_eq!(t.extract(PriceType::Bid).unwrap(), t.bid);
        assert_eq!(t.extract(PriceType::Ask).unwrap(), t.ask);
    }

    #[test]
    fn extract_mid_halves_the_sum() {
        let t = tick("1.00010", "1.00030");
        let mid = t.extract(PriceType::Mid).unwrap();
        assert_eq!(mid.value(), dec!(1.00020));
    }

    #[test]
    fn extract_size_mid_averages_sides() {
        let mut t = tick("1.00010", "1.00030");
        t.bid_size = Quantity::from_units(1_000_000);
        t.ask_size = Quantity::from_units(3_000_000);
        let size = t.extract_size(PriceType::Mid).unwrap();
        assert_eq!(size.value(), dec!(2_000_000));
    }

    #[test]
    fn mid_precision_is_one_more_than_quotes() {
        let t = tick("1.00010", "1.00015");
        let mid = t.extract(PriceType::Mid).unwrap();
        assert_eq!(mid.precision(), 6);
        assert_eq!(mid.value(), dec!(1.000125));
    }
}
