//! Position aggregate: net holding resulting from fills sharing a position id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::order::OrderSide;
use crate::domain::shared::{PositionId, Price, Quantity, Symbol, Timestamp};

/// Market side of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// Net bought.
    Long,
    /// Net zero.
    Flat,
    /// Net sold.
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Flat => write!(f, "FLAT"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// A single fill applied to a position.
///
/// `quantity` is the incremental quantity of this execution, not the
/// order's cumulative fill.
#[derive(Debug, Clone, Copy)]
pub struct PositionFill {
    /// Fill side.
    pub side: OrderSide,
    /// Incremental fill quantity.
    pub quantity: Quantity,
    /// Fill price.
    pub price: Price,
    /// Execution time.
    pub timestamp: Timestamp,
}

/// Position aggregate.
///
/// Opened by the first fill referencing its id and mutated by every
/// subsequent fill sharing that id. Open while net quantity is non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    position_id: PositionId,
    symbol: Symbol,
    entry_side: OrderSide,
    opened_time: Timestamp,
    last_updated: Timestamp,
    buy_quantity: Decimal,
    sell_quantity: Decimal,
    buy_volume_price: Decimal,
    sell_volume_price: Decimal,
    fill_count: usize,
}

impl Position {
    /// Open a position from its first fill.
    #[must_use]
    pub fn open(position_id: PositionId, symbol: Symbol, fill: &PositionFill) -> Self {
        let mut position = Self {
            position_id,
            symbol,
            entry_side: fill.side,
            opened_time: fill.timestamp,
            last_updated: fill.timestamp,
            buy_quantity: Decimal::ZERO,
            sell_quantity: Decimal::ZERO,
            buy_volume_price: Decimal::ZERO,
            sell_volume_price: Decimal::ZERO,
            fill_count: 0,
        };
        position.apply_fill(fill);
        position
    }

    /// Apply a subsequent fill.
    pub fn apply_fill(&mut self, fill: &PositionFill) {
        let qty = fill.quantity.value();
        let notional = qty * fill.price.value();
        match fill.side {
            OrderSide::Buy => {
                self.buy_quantity += qty;
                self.buy_volume_price += notional;
            }
            OrderSide::Sell => {
                self.sell_quantity += qty;
                self.sell_volume_price += notional;
            }
        }
        self.fill_count += 1;
        self.last_updated = fill.timestamp;
    }

    /// Position ID.
    #[must_use]
    pub const fn position_id(&self) -> &PositionId {
        &self.position_id
    }

    /// Symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Side of the opening fill.
    #[must_use]
    pub const fn entry_side(&self) -> OrderSide {
        self.entry_side
    }

    /// Signed net quantity (buys minus sells).
    #[must_use]
    pub fn net_quantity(&self) -> Decimal {
        self.buy_quantity - self.sell_quantity
    }

    /// Current market side.
    #[must_use]
    pub fn side(&self) -> PositionSide {
        let net = self.net_quantity();
        if net > Decimal::ZERO {
            PositionSide::Long
        } else if net < Decimal::ZERO {
            PositionSide::Short
        } else {
            PositionSide::Flat
        }
    }

    /// Returns true while the net quantity is non-zero.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.net_quantity().is_zero()
    }

    /// Returns true once the position has been flattened.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Volume-weighted average price of fills on the entry side.
    #[must_use]
    pub fn average_entry_price(&self) -> Option<Decimal> {
        let (qty, notional) = match self.entry_side {
            OrderSide::Buy => (self.buy_quantity, self.buy_volume_price),
            OrderSide::Sell => (self.sell_quantity, self.sell_volume_price),
        };
        (!qty.is_zero()).then(|| notional / qty)
    }

    /// Volume-weighted average price of fills on the exit side.
    #[must_use]
    pub fn average_exit_price(&self) -> Option<Decimal> {
        let (qty, notional) = match self.entry_side {
            OrderSide::Buy => (self.sell_quantity, self.sell_volume_price),
            OrderSide::Sell => (self.buy_quantity, self.buy_volume_price),
        };
        (!qty.is_zero()).then(|| notional / qty)
    }

    /// Realized points on the exited quantity: exit VWAP minus entry
    /// VWAP, signed by direction.
    #[must_use]
    pub fn realized_points(&self) -> Decimal {
        match (self.average_entry_price(), self.average_exit_price()) {
            (Some(entry), Some(exit)) => match self.entry_side {
                OrderSide::Buy => exit - entry,
                OrderSide::Sell => entry - exit,
            },
            _ => Decimal::ZERO,
        }
    }

    /// Unrealized points on the open quantity at the given price.
    #[must_use]
    pub fn unrealized_points(&self, last: Price) -> Decimal {
        if self.is_closed() {
            return Decimal::ZERO;
        }
        match self.average_entry_price() {
            Some(entry) => match self.side() {
                PositionSide::Long => last.value() - entry,
                PositionSide::Short => entry - last.value(),
                PositionSide::Flat => Decimal::ZERO,
            },
            None => Decimal::ZERO,
        }
    }

    /// Number of fills applied.
    #[must_use]
    pub const fn fill_count(&self) -> usize {
        self.fill_count
    }
}
