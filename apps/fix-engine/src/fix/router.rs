//! Outbound command to wire message routing.
//!
//! Each domain command maps to exactly one outbound message. An
//! unresolvable symbol aborts the send with an error rather than
//! emitting a malformed message.

use std::sync::Arc;

use tracing::{debug, error};

use super::symbol_map::SymbolMap;
use crate::domain::order::{BracketOrder, Order, OrderSide, OrderType, TimeInForce};
use crate::domain::shared::{AccountId, Price, Quantity};
use crate::engine::gateway::{GatewayError, TradingGateway};

/// Every outbound message the router constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFixMessage {
    /// Single order submission (MsgType D).
    NewOrderSingle(NewOrderSingle),
    /// Linked bracket submission (MsgType E).
    NewOrderList(NewOrderList),
    /// Cancel request (MsgType F).
    OrderCancelRequest(OrderCancelRequest),
    /// Cancel/replace request (MsgType G).
    OrderCancelReplaceRequest(OrderCancelReplaceRequest),
    /// Account snapshot request (MsgType BB).
    CollateralInquiry(CollateralInquiry),
}

/// Single order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderSingle {
    /// ClOrdID (11).
    pub order_id: String,
    /// Broker symbol code (55).
    pub symbol_code: String,
    /// Side (54).
    pub side: char,
    /// OrdType (40).
    pub order_type: char,
    /// OrderQty (38).
    pub quantity: String,
    /// Price (44) or StopPx (99), absent for market orders.
    pub price: Option<String>,
    /// TimeInForce (59).
    pub time_in_force: char,
    /// ExpireTime (126), for GTD orders.
    pub expire_time: Option<String>,
}

/// Linked bracket submission: entry plus protective orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderList {
    /// Constituent orders, entry first.
    pub orders: Vec<NewOrderSingle>,
}

/// Cancel request for a working order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCancelRequest {
    /// ClOrdID (11) of the order to cancel.
    pub order_id: String,
    /// Broker order id (37), when known.
    pub broker_order_id: Option<String>,
    /// Free-text reason (58).
    pub reason: String,
}

/// Cancel/replace request for a working order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCancelReplaceRequest {
    /// ClOrdID (11) of the order to modify.
    pub order_id: String,
    /// Broker order id (37), when known.
    pub broker_order_id: Option<String>,
    /// Broker symbol code (55).
    pub symbol_code: String,
    /// Side (54).
    pub side: char,
    /// New quantity (38).
    pub quantity: String,
    /// New price (44).
    pub price: String,
}

/// Account snapshot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollateralInquiry {
    /// Account (1).
    pub account_id: String,
}

/// The broker session boundary. Implemented by the FIX session library
/// adapter; sends are synchronous hand-offs to the session's own queue.
pub trait FixSession: Send + Sync {
    /// Hand one message to the session for transmission.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is disconnected or refuses the
    /// message.
    fn send(&self, message: OutboundFixMessage) -> Result<(), GatewayError>;
}

/// Routes engine commands to the FIX session.
pub struct FixRouter {
    session: Arc<dyn FixSession>,
    symbol_map: Arc<SymbolMap>,
}

impl FixRouter {
    /// Create a router over a session and symbol map.
    #[must_use]
    pub fn new(session: Arc<dyn FixSession>, symbol_map: Arc<SymbolMap>) -> Self {
        Self {
            session,
            symbol_map,
        }
    }

    fn build_new_order_single(&self, order: &Order) -> Result<NewOrderSingle, GatewayError> {
        let symbol_code = self.resolve_broker_code(order)?;
        Ok(NewOrderSingle {
            order_id: order.order_id().to_string(),
            symbol_code,
            side: side_code(order.side()),
            order_type: order_type_code(order.order_type()),
            quantity: order.quantity().value().to_string(),
            price: order.price().map(|p| p.value().to_string()),
            time_in_force: time_in_force_code(order.time_in_force()),
            expire_time: order.expire_time().map(|t| t.to_string()),
        })
    }

    fn resolve_broker_code(&self, order: &Order) -> Result<String, GatewayError> {
        match self.symbol_map.broker_code(order.symbol()) {
            Some(code) => Ok(code.to_string()),
            None => {
                error!(
                    symbol = %order.symbol(),
                    order_id = %order.order_id(),
                    "aborting send: no broker code mapped for symbol",
                );
                Err(GatewayError::UnknownSymbol {
                    symbol: order.symbol().to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for FixRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixRouter")
            .field("symbol_map", &self.symbol_map)
            .finish_non_exhaustive()
    }
}

impl TradingGateway for FixRouter {
    fn submit_order(&self, order: &Order) -> Result<(), GatewayError> {
        let message = self.build_new_order_single(order)?;
        debug!(order_id = %order.order_id(), "routing NewOrderSingle");
        self.session.send(OutboundFixMessage::NewOrderSingle(message))
    }

    fn submit_bracket_order(&self, bracket: &BracketOrder) -> Result<(), GatewayError> {
        let orders = bracket
            .orders()
            .into_iter()
            .map(|order| self.build_new_order_single(order))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(entry_id = %bracket.entry().order_id(), "routing NewOrderList");
        self.session
            .send(OutboundFixMessage::NewOrderList(NewOrderList { orders }))
    }

    fn cancel_order(&self, order: &Order, reason: &str) -> Result<(), GatewayError> {
        debug!(order_id = %order.order_id(), "routing OrderCancelRequest");
        self.session
            .send(OutboundFixMessage::OrderCancelRequest(OrderCancelRequest {
                order_id: order.order_id().to_string(),
                broker_order_id: order.broker_order_id().map(ToString::to_string),
                reason: reason.to_string(),
            }))
    }

    fn modify_order(
        &self,
        order: &Order,
        quantity: Quantity,
        price: Price,
    ) -> Result<(), GatewayError> {
        let symbol_code = self.resolve_broker_code(order)?;
        debug!(order_id = %order.order_id(), "routing OrderCancelReplaceRequest");
        self.session.send(OutboundFixMessage::OrderCancelReplaceRequest(
            OrderCancelReplaceRequest {
                order_id: order.order_id().to_string(),
                broker_order_id: order.broker_order_id().map(ToString::to_string),
                symbol_code,
                side: side_code(order.side()),
                quantity: quantity.value().to_string(),
                price: price.value().to_string(),
            },
        ))
    }

    fn account_inquiry(&self, account_id: &AccountId) -> Result<(), GatewayError> {
        debug!(%account_id, "routing CollateralInquiry");
        self.session
            .send(OutboundFixMessage::CollateralInquiry(CollateralInquiry {
                account_id: account_id.to_string(),
            }))
    }
}

const fn side_code(side: OrderSide) -> char {
    match side {
        OrderSide::Buy => '1',
        OrderSide::Sell => '2',
    }
}

const fn order_type_code(order_type: OrderType) -> char {
    match order_type {
        OrderType::Market => '1',
        OrderType::Limit => '2',
        OrderType::Stop => '3',
        OrderType::StopLimit => '4',
    }
}

const fn time_in_force_code(time_in_force: TimeInForce) -> char {
    match time_in_force {
        TimeInForce::Day => '0',
        TimeInForce::Gtc => '1',
        TimeInForce::Ioc => '3',
        TimeInForce::Fok => '4',
        TimeInForce::Gtd => '6',
    }
}
