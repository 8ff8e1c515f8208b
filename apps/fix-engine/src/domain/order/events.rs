//! Order lifecycle events.
//!
//! Flat tagged variants, each carrying its own required fields plus the
//! shared envelope (event id, timestamp, order id).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{OrderSide, OrderType, TimeInForce};
use crate::domain::shared::{
    BrokerOrderId, ExecutionId, OrderId, Price, Quantity, Symbol, Timestamp,
};

/// All possible order events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEvent {
    /// Order forwarded to the broker gateway.
    Submitted(OrderSubmitted),
    /// Order acknowledged by the broker.
    Accepted(OrderAccepted),
    /// Order rejected by the broker.
    Rejected(OrderRejected),
    /// Order resting in the market.
    Working(OrderWorking),
    /// Working order modified in place.
    Modified(OrderModified),
    /// Order cancelled.
    Cancelled(OrderCancelled),
    /// Order expired by its time in force.
    Expired(OrderExpired),
    /// Order partially filled.
    PartiallyFilled(OrderPartiallyFilled),
    /// Order completely filled.
    Filled(OrderFilled),
    /// Cancel or modify request rejected; informational, no state change.
    CancelReject(OrderCancelReject),
    /// Order denied before submission (risk/compliance).
    Denied(OrderDenied),
    /// Order invalid before submission (failed validation).
    Invalid(OrderInvalid),
}

impl OrderEvent {
    /// Get the order ID for this event.
    #[must_use]
    pub fn order_id(&self) -> &OrderId {
        match self {
            Self::Submitted(e) => &e.order_id,
            Self::Accepted(e) => &e.order_id,
            Self::Rejected(e) => &e.order_id,
            Self::Working(e) => &e.order_id,
            Self::Modified(e) => &e.order_id,
            Self::Cancelled(e) => &e.order_id,
            Self::Expired(e) => &e.order_id,
            Self::PartiallyFilled(e) => &e.order_id,
            Self::Filled(e) => &e.order_id,
            Self::CancelReject(e) => &e.order_id,
            Self::Denied(e) => &e.order_id,
            Self::Invalid(e) => &e.order_id,
        }
    }

    /// Get the event's unique identifier.
    #[must_use]
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::Submitted(e) => e.event_id,
            Self::Accepted(e) => e.event_id,
            Self::Rejected(e) => e.event_id,
            Self::Working(e) => e.event_id,
            Self::Modified(e) => e.event_id,
            Self::Cancelled(e) => e.event_id,
            Self::Expired(e) => e.event_id,
            Self::PartiallyFilled(e) => e.event_id,
            Self::Filled(e) => e.event_id,
            Self::CancelReject(e) => e.event_id,
            Self::Denied(e) => e.event_id,
            Self::Invalid(e) => e.event_id,
        }
    }

    /// Get the timestamp when this event occurred.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Submitted(e) => e.timestamp,
            Self::Accepted(e) => e.timestamp,
            Self::Rejected(e) => e.timestamp,
            Self::Working(e) => e.timestamp,
            Self::Modified(e) => e.timestamp,
            Self::Cancelled(e) => e.timestamp,
            Self::Expired(e) => e.timestamp,
            Self::PartiallyFilled(e) => e.timestamp,
            Self::Filled(e) => e.timestamp,
            Self::CancelReject(e) => e.timestamp,
            Self::Denied(e) => e.timestamp,
            Self::Invalid(e) => e.timestamp,
        }
    }

    /// Get the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Submitted(_) => "ORDER_SUBMITTED",
            Self::Accepted(_) => "ORDER_ACCEPTED",
            Self::Rejected(_) => "ORDER_REJECTED",
            Self::Working(_) => "ORDER_WORKING",
            Self::Modified(_) => "ORDER_MODIFIED",
            Self::Cancelled(_) => "ORDER_CANCELLED",
            Self::Expired(_) => "ORDER_EXPIRED",
            Self::PartiallyFilled(_) => "ORDER_PARTIALLY_FILLED",
            Self::Filled(_) => "ORDER_FILLED",
            Self::CancelReject(_) => "ORDER_CANCEL_REJECT",
            Self::Denied(_) => "ORDER_DENIED",
            Self::Invalid(_) => "ORDER_INVALID",
        }
    }
}

/// Event: order forwarded to the broker gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmitted {
    /// Order ID.
    pub order_id: OrderId,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order acknowledged by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAccepted {
    /// Order ID.
    pub order_id: OrderId,
    /// Broker's order ID (suffix already stripped).
    pub broker_order_id: BrokerOrderId,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order rejected by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejected {
    /// Order ID.
    pub order_id: OrderId,
    /// Broker-supplied rejection reason.
    pub reason: String,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order resting in the market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWorking {
    /// Order ID.
    pub order_id: OrderId,
    /// Broker's order ID (suffix already stripped).
    pub broker_order_id: BrokerOrderId,
    /// Symbol.
    pub symbol: Symbol,
    /// Side.
    pub side: OrderSide,
    /// Order type.
    pub order_type: OrderType,
    /// Working quantity.
    pub quantity: Quantity,
    /// Working price, if the order type has one.
    pub price: Option<Price>,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Expiry, for GTD orders.
    pub expire_time: Option<Timestamp>,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: working order modified in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderModified {
    /// Order ID.
    pub order_id: OrderId,
    /// Broker's order ID (suffix already stripped).
    pub broker_order_id: BrokerOrderId,
    /// Quantity after modification.
    pub modified_quantity: Quantity,
    /// Price after modification.
    pub modified_price: Price,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    /// Order ID.
    pub order_id: OrderId,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order expired by its time in force.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpired {
    /// Order ID.
    pub order_id: OrderId,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order partially filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPartiallyFilled {
    /// Order ID.
    pub order_id: OrderId,
    /// Broker's execution ID for this fill.
    pub execution_id: ExecutionId,
    /// Symbol.
    pub symbol: Symbol,
    /// Side.
    pub side: OrderSide,
    /// Cumulative filled quantity.
    pub filled_quantity: Quantity,
    /// Quantity remaining to fill.
    pub leaves_quantity: Quantity,
    /// Average fill price so far.
    pub average_price: Price,
    /// When the execution took place at the broker.
    pub execution_time: Timestamp,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order completely filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilled {
    /// Order ID.
    pub order_id: OrderId,
    /// Broker's execution ID for the final fill.
    pub execution_id: ExecutionId,
    /// Symbol.
    pub symbol: Symbol,
    /// Side.
    pub side: OrderSide,
    /// Total filled quantity.
    pub filled_quantity: Quantity,
    /// Average fill price.
    pub average_price: Price,
    /// When the execution took place at the broker.
    pub execution_time: Timestamp,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: a cancel or modify request was rejected.
///
/// Informational only; the order keeps its current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelReject {
    /// Order ID.
    pub order_id: OrderId,
    /// The request being rejected ("CANCEL" or "MODIFY").
    pub response_to: String,
    /// Broker-supplied reason.
    pub reason: String,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order denied before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDenied {
    /// Order ID.
    pub order_id: OrderId,
    /// Denial reason.
    pub reason: String,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}

/// Event: order failed validation before submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInvalid {
    /// Order ID.
    pub order_id: OrderId,
    /// Validation failure reason.
    pub reason: String,
    /// Unique event ID.
    pub event_id: Uuid,
    /// When the event occurred.
    pub timestamp: Timestamp,
}
