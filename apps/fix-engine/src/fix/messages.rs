//! Parsed broker wire messages.
//!
//! The session library delivers tag/value messages already split into
//! fields; everything here is still raw text exactly as it arrived.
//! Translation into typed domain events happens in [`crate::fix::translator`].

use serde::{Deserialize, Serialize};

/// Every inbound message the translator understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixMessage {
    /// Order lifecycle report (MsgType 8).
    ExecutionReport(ExecutionReport),
    /// Cancel or cancel/replace rejected (MsgType 9).
    OrderCancelReject(OrderCancelReject),
    /// Account balance and margin snapshot (MsgType BA).
    CollateralReport(CollateralReport),
    /// Bid/ask refresh for one symbol (MsgType W).
    MarketDataSnapshot(MarketDataSnapshot),
    /// Tradeable instruments refresh (MsgType y).
    SecurityList(SecurityList),
    /// Application-level reject (MsgType j).
    BusinessMessageReject(BusinessMessageReject),
}

/// Order lifecycle report. `order_status` is the raw OrdStatus (39) code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// ClOrdID (11): our order id, echoed back by the broker.
    pub order_id: String,
    /// OrderID (37): broker-assigned id, possibly suffix-decorated.
    pub broker_order_id: String,
    /// ExecID (17).
    pub execution_id: String,
    /// Broker symbol code (55).
    pub symbol_code: String,
    /// OrdStatus (39).
    pub order_status: char,
    /// Side (54): '1' buy, '2' sell.
    pub side: char,
    /// OrdType (40): '1' market, '2' limit, '3' stop, '4' stop-limit.
    pub order_type: char,
    /// OrderQty (38).
    pub quantity: String,
    /// Price (44) or StopPx (99), whichever the order carries.
    pub price: Option<String>,
    /// TimeInForce (59): '0' day, '1' GTC, '3' IOC, '4' FOK, '6' GTD.
    pub time_in_force: char,
    /// ExpireTime (126), for GTD orders.
    pub expire_time: Option<String>,
    /// CumQty (14): cumulative filled quantity.
    pub cum_quantity: String,
    /// LeavesQty (151).
    pub leaves_quantity: String,
    /// AvgPx (6).
    pub average_price: String,
    /// TransactTime (60), UTC.
    pub transact_time: String,
    /// Text (58): broker commentary, e.g. a reject reason.
    pub text: Option<String>,
}

/// Cancel or cancel/replace rejected by the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelReject {
    /// ClOrdID (11) of the rejected request.
    pub order_id: String,
    /// CxlRejResponseTo (434): '1' cancel, '2' cancel/replace.
    pub response_to: char,
    /// Text (58).
    pub reason: String,
    /// TransactTime (60), UTC.
    pub transact_time: String,
}

/// Account balance and margin snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralReport {
    /// Account (1).
    pub account_id: String,
    /// Currency (15), ISO code.
    pub currency: String,
    /// CashOutstanding (901).
    pub cash_balance: String,
    /// StartCash (921).
    pub cash_start_day: String,
    /// MarginExcess-derived maintenance margin.
    pub margin_used_maintenance: String,
    /// Liquidation margin requirement.
    pub margin_used_liquidation: String,
    /// MarginRatio (898).
    pub margin_ratio: String,
    /// Broker margin call field: "N", "M" or "L".
    pub margin_call_status: String,
    /// TransactTime (60), UTC.
    pub transact_time: String,
}

/// Bid/ask refresh for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    /// Broker symbol code (55).
    pub symbol_code: String,
    /// Best bid price.
    pub bid: String,
    /// Best ask price.
    pub ask: String,
    /// Size at the bid.
    pub bid_size: String,
    /// Size at the ask.
    pub ask_size: String,
    /// SendingTime (52), UTC.
    pub timestamp: String,
}

/// Tradeable instruments refresh. Replaces the instrument set wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityList {
    /// Broker symbol codes currently tradeable.
    pub symbol_codes: Vec<String>,
}

/// Application-level reject for a message we sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessMessageReject {
    /// RefMsgType (372).
    pub ref_msg_type: String,
    /// BusinessRejectReason (380).
    pub reason: String,
    /// Text (58).
    pub text: Option<String>,
}
