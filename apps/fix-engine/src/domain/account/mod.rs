//! Account aggregate: broker-reported balances and margin state.
//!
//! Account state is sourced from the broker and replaced wholesale on
//! every snapshot; the engine never computes balances itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::shared::{AccountId, Money, Timestamp};

/// Broker margin call status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarginCallStatus {
    /// No margin call in effect.
    None,
    /// Broker has issued a margin call.
    MarginCall,
    /// Broker is liquidating positions.
    LiquidationInProgress,
}

/// A full account snapshot reported by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStateEvent {
    /// Account the snapshot belongs to.
    pub account_id: AccountId,
    /// Current cash balance.
    pub cash_balance: Money,
    /// Cash balance at the start of the trading day.
    pub cash_start_day: Money,
    /// Margin consumed by maintenance requirements.
    pub margin_used_maintenance: Money,
    /// Margin consumed by liquidation requirements.
    pub margin_used_liquidation: Money,
    /// Margin ratio as reported, e.g. "0.05".
    pub margin_ratio: String,
    /// Broker margin call status.
    pub margin_call_status: MarginCallStatus,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the snapshot was produced.
    pub timestamp: Timestamp,
}

/// Account aggregate, always reflecting the latest broker snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    account_id: AccountId,
    cash_balance: Money,
    cash_start_day: Money,
    margin_used_maintenance: Money,
    margin_used_liquidation: Money,
    margin_ratio: String,
    margin_call_status: MarginCallStatus,
    last_event_id: Uuid,
    last_updated: Timestamp,
}

impl Account {
    /// Build an account from its first broker snapshot.
    #[must_use]
    pub fn from_event(event: &AccountStateEvent) -> Self {
        Self {
            account_id: event.account_id.clone(),
            cash_balance: event.cash_balance,
            cash_start_day: event.cash_start_day,
            margin_used_maintenance: event.margin_used_maintenance,
            margin_used_liquidation: event.margin_used_liquidation,
            margin_ratio: event.margin_ratio.clone(),
            margin_call_status: event.margin_call_status,
            last_event_id: event.event_id,
            last_updated: event.timestamp,
        }
    }

    /// Replace the account state with a newer snapshot.
    pub fn apply(&mut self, event: &AccountStateEvent) {
        self.cash_balance = event.cash_balance;
        self.cash_start_day = event.cash_start_day;
        self.margin_used_maintenance = event.margin_used_maintenance;
        self.margin_used_liquidation = event.margin_used_liquidation;
        self.margin_ratio = event.margin_ratio.clone();
        self.margin_call_status = event.margin_call_status;
        self.last_event_id = event.event_id;
        self.last_updated = event.timestamp;
    }

    /// Account ID.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Latest cash balance.
    #[must_use]
    pub const fn cash_balance(&self) -> Money {
        self.cash_balance
    }

    /// Cash balance at the start of the trading day.
    #[must_use]
    pub const fn cash_start_day(&self) -> Money {
        self.cash_start_day
    }

    /// Intraday cash movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the broker reported mixed currencies.
    pub fn cash_activity_day(&self) -> Result<Money, crate::domain::shared::DomainError> {
        self.cash_balance.checked_sub(&self.cash_start_day)
    }

    /// Margin consumed by maintenance requirements.
    #[must_use]
    pub const fn margin_used_maintenance(&self) -> Money {
        self.margin_used_maintenance
    }

    /// Margin consumed by liquidation requirements.
    #[must_use]
    pub const fn margin_used_liquidation(&self) -> Money {
        self.margin_used_liquidation
    }

    /// Margin ratio as reported.
    #[must_use]
    pub fn margin_ratio(&self) -> &str {
        &self.margin_ratio
    }

    /// Broker margin call status.
    #[must_use]
    pub const fn margin_call_status(&self) -> MarginCallStatus {
        self.margin_call_status
    }

    /// ID of the snapshot last applied.
    #[must_use]
    pub const fn last_event_id(&self) -> Uuid {
        self.last_event_id
    }

    /// Time of the snapshot last applied.
    #[must_use]
    pub const fn last_updated(&self) -> Timestamp {
        self.last_updated
    }
}
