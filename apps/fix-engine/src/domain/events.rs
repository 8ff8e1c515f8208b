//! Top-level event union republished to engine subscribers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::AccountStateEvent;
use crate::domain::market::{Bar, BarType};
use crate::domain::order::OrderEvent;
use crate::domain::shared::{Symbol, Timestamp};

/// Market session opened for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOpened {
    /// The symbol whose session opened.
    pub symbol: Symbol,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the session opened.
    pub timestamp: Timestamp,
}

/// Market session closed for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketClosed {
    /// The symbol whose session closed.
    pub symbol: Symbol,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the session closed.
    pub timestamp: Timestamp,
}

/// A completed bar for a subscribed bar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarDataEvent {
    /// The series the bar belongs to.
    pub bar_type: BarType,
    /// The completed bar.
    pub bar: Bar,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the bar was emitted.
    pub timestamp: Timestamp,
}

/// Every event the engine applies and republishes.
///
/// Externally tagged so the order variant's own `type` tag survives
/// inside the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    /// An order lifecycle event.
    Order(OrderEvent),
    /// A broker account snapshot.
    AccountState(AccountStateEvent),
    /// A market session opened.
    MarketOpened(MarketOpened),
    /// A market session closed.
    MarketClosed(MarketClosed),
    /// A completed bar.
    BarData(BarDataEvent),
}

impl Event {
    /// Get the event's unique identifier.
    #[must_use]
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::Order(e) => e.event_id(),
            Self::AccountState(e) => e.event_id,
            Self::MarketOpened(e) => e.event_id,
            Self::MarketClosed(e) => e.event_id,
            Self::BarData(e) => e.event_id,
        }
    }

    /// Get the event's timestamp.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Order(e) => e.timestamp(),
            Self::AccountState(e) => e.timestamp,
            Self::MarketOpened(e) => e.timestamp,
            Self::MarketClosed(e) => e.timestamp,
            Self::BarData(e) => e.timestamp,
        }
    }
}
