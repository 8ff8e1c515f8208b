//! Errors for the order aggregate.

use thiserror::Error;

use super::state::OrderState;
use crate::domain::shared::{DomainError, OrderId};

/// Errors raised by order construction and event application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// An event is illegal for the order's current state.
    ///
    /// Application is a no-op; the order is not mutated.
    #[error("Order {order_id}: event {event} illegal in state {from}")]
    InvalidTransition {
        /// The order.
        order_id: OrderId,
        /// Current state.
        from: OrderState,
        /// The offending event type.
        event: &'static str,
    },

    /// A fill would exceed the order's original quantity.
    #[error("Order {order_id}: fill quantity {filled} exceeds order quantity {quantity}")]
    OverFill {
        /// The order.
        order_id: OrderId,
        /// Cumulative filled quantity reported.
        filled: String,
        /// Original order quantity.
        quantity: String,
    },

    /// Invalid order construction parameters.
    #[error("Invalid order parameter '{field}': {message}")]
    InvalidParameters {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// An underlying value object rejected a value.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
