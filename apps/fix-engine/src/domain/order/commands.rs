//! Trading commands consumed by the execution engine.
//!
//! Each command carries a unique command id, a timestamp, and the
//! identity context needed to index the resulting state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bracket::BracketOrder;
use super::order::Order;
use crate::domain::shared::{
    AccountId, OrderId, PositionId, Price, Quantity, StrategyId, Timestamp, TraderId,
};

/// All commands accepted by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingCommand {
    /// Submit a single order.
    SubmitOrder(SubmitOrder),
    /// Submit an entry with linked protective orders as one unit.
    SubmitBracketOrder(SubmitBracketOrder),
    /// Cancel a working order.
    CancelOrder(CancelOrder),
    /// Modify a working order's price/quantity.
    ModifyOrder(ModifyOrder),
    /// Request a fresh account state snapshot from the broker.
    AccountInquiry(AccountInquiry),
}

impl TradingCommand {
    /// Get the command's unique identifier.
    #[must_use]
    pub const fn command_id(&self) -> Uuid {
        match self {
            Self::SubmitOrder(c) => c.command_id,
            Self::SubmitBracketOrder(c) => c.command_id,
            Self::CancelOrder(c) => c.command_id,
            Self::ModifyOrder(c) => c.command_id,
            Self::AccountInquiry(c) => c.command_id,
        }
    }
}

/// Command: submit a single order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrder {
    /// Trader submitting the order.
    pub trader_id: TraderId,
    /// Account to trade on.
    pub account_id: AccountId,
    /// Strategy originating the order.
    pub strategy_id: StrategyId,
    /// Position the order contributes to.
    pub position_id: PositionId,
    /// The initialized order.
    pub order: Order,
    /// Unique command ID.
    pub command_id: Uuid,
    /// When the command was issued.
    pub timestamp: Timestamp,
}

/// Command: submit a bracket order atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBracketOrder {
    /// Trader submitting the order.
    pub trader_id: TraderId,
    /// Account to trade on.
    pub account_id: AccountId,
    /// Strategy originating the order.
    pub strategy_id: StrategyId,
    /// Position the orders contribute to.
    pub position_id: PositionId,
    /// The bracket.
    pub bracket: BracketOrder,
    /// Unique command ID.
    pub command_id: Uuid,
    /// When the command was issued.
    pub timestamp: Timestamp,
}

/// Command: cancel a working order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    /// Trader issuing the cancel.
    pub trader_id: TraderId,
    /// The order to cancel.
    pub order_id: OrderId,
    /// Free-text reason, forwarded to the broker where supported.
    pub reason: String,
    /// Unique command ID.
    pub command_id: Uuid,
    /// When the command was issued.
    pub timestamp: Timestamp,
}

/// Command: modify a working order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyOrder {
    /// Trader issuing the modify.
    pub trader_id: TraderId,
    /// The order to modify.
    pub order_id: OrderId,
    /// New quantity.
    pub modified_quantity: Quantity,
    /// New price.
    pub modified_price: Price,
    /// Unique command ID.
    pub command_id: Uuid,
    /// When the command was issued.
    pub timestamp: Timestamp,
}

/// Command: request an account state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInquiry {
    /// Trader issuing the inquiry.
    pub trader_id: TraderId,
    /// Account to inspect.
    pub account_id: AccountId,
    /// Unique command ID.
    pub command_id: Uuid,
    /// When the command was issued.
    pub timestamp: Timestamp,
}
