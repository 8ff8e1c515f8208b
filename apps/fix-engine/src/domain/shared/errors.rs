//! Domain errors shared across aggregates and value objects.

use thiserror::Error;

/// Domain-level errors independent of infrastructure concerns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Invalid value for a field.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// Arithmetic between values of incompatible precision.
    ///
    /// The operand precision must not exceed the receiver precision,
    /// otherwise information would be silently truncated.
    #[error("Precision mismatch: operand precision {operand} exceeds receiver precision {receiver}")]
    PrecisionMismatch {
        /// Receiver precision.
        receiver: u32,
        /// Operand precision.
        operand: u32,
    },

    /// Arithmetic result would be negative on a non-negative type.
    #[error("{type_name} cannot be negative: {value}")]
    NegativeValue {
        /// The value type that rejected the result.
        type_name: &'static str,
        /// The offending value.
        value: String,
    },

    /// Arithmetic between money of different currencies.
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Left operand currency.
        left: String,
        /// Right operand currency.
        right: String,
    },
}
