//! Trading gateway abstraction.
//!
//! The engine forwards validated commands through this trait; the FIX
//! router is the production implementation. Calls are synchronous and
//! non-blocking; actual wire I/O happens behind the session library.

use thiserror::Error;

use crate::domain::order::{BracketOrder, Order};
use crate::domain::shared::{AccountId, Price, Quantity};

/// Gateway failures surfaced back to the engine.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No broker code is mapped for the order's symbol.
    #[error("no broker code mapped for symbol {symbol}")]
    UnknownSymbol {
        /// The unmapped symbol.
        symbol: String,
    },
    /// The session rejected or failed the send.
    #[error("session send failed: {message}")]
    SendFailed {
        /// Failure detail from the session library.
        message: String,
    },
    /// The session is not connected.
    #[error("session disconnected")]
    Disconnected,
}

/// Forwarding surface between the engine and the broker.
pub trait TradingGateway: Send + Sync {
    /// Forward a single order submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol cannot be mapped or the send fails.
    fn submit_order(&self, order: &Order) -> Result<(), GatewayError>;

    /// Forward an atomic bracket submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol cannot be mapped or the send fails.
    fn submit_bracket_order(&self, bracket: &BracketOrder) -> Result<(), GatewayError>;

    /// Forward a cancel request for a working order.
    ///
    /// # Errors
    ///
    /// Returns an error if the send fails.
    fn cancel_order(&self, order: &Order, reason: &str) -> Result<(), GatewayError>;

    /// Forward a cancel/replace request for a working order.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol cannot be mapped or the send fails.
    fn modify_order(
        &self,
        order: &Order,
        quantity: Quantity,
        price: Price,
    ) -> Result<(), GatewayError>;

    /// Request a fresh account snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the send fails.
    fn account_inquiry(&self, account_id: &AccountId) -> Result<(), GatewayError>;
}

/// In-memory gateway that records every forwarded call, for tests.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    calls: parking_lot::Mutex<Vec<GatewayCall>>,
}

/// One recorded gateway invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// `submit_order` was invoked.
    Submit {
        /// Order id submitted.
        order_id: String,
    },
    /// `submit_bracket_order` was invoked.
    SubmitBracket {
        /// Constituent order ids, entry first.
        order_ids: Vec<String>,
    },
    /// `cancel_order` was invoked.
    Cancel {
        /// Order id cancelled.
        order_id: String,
        /// Cancel reason.
        reason: String,
    },
    /// `modify_order` was invoked.
    Modify {
        /// Order id modified.
        order_id: String,
        /// Requested quantity.
        quantity: Quantity,
        /// Requested price.
        price: Price,
    },
    /// `account_inquiry` was invoked.
    AccountInquiry {
        /// Account queried.
        account_id: String,
    },
}

impl RecordingGateway {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }
}

impl TradingGateway for RecordingGateway {
    fn submit_order(&self, order: &Order) -> Result<(), GatewayError> {
        self.calls.lock().push(GatewayCall::Submit {
            order_id: order.order_id().to_string(),
        });
        Ok(())
    }

    fn submit_bracket_order(&self, bracket: &BracketOrder) -> Result<(), GatewayError> {
        self.calls.lock().push(GatewayCall::SubmitBracket {
            order_ids: bracket.order_ids().iter().map(ToString::to_string).collect(),
        });
        Ok(())
    }

    fn cancel_order(&self, order: &Order, reason: &str) -> Result<(), GatewayError> {
        self.calls.lock().push(GatewayCall::Cancel {
            order_id: order.order_id().to_string(),
            reason: reason.to_string(),
        });
        Ok(())
    }

    fn modify_order(
        &self,
        order: &Order,
        quantity: Quantity,
        price: Price,
    ) -> Result<(), GatewayError> {
        self.calls.lock().push(GatewayCall::Modify {
            order_id: order.order_id().to_string(),
            quantity,
            price,
        });
        Ok(())
    }

    fn account_inquiry(&self, account_id: &AccountId) -> Result<(), GatewayError> {
        self.calls.lock().push(GatewayCall::AccountInquiry {
            account_id: account_id.to_string(),
        });
        Ok(())
    }
}
