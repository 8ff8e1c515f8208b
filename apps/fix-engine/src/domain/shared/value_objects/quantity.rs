//! Quantity value object for order sizes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::shared::DomainError;

/// A non-negative order quantity with an explicit decimal precision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quantity {
    value: Decimal,
    precision: u32,
}

impl Quantity {
    /// Create a new quantity at the given precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative.
    pub fn new(value: Decimal, precision: u32) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::NegativeValue {
                type_name: "Quantity",
                value: value.to_string(),
            });
        }
        Ok(Self {
            value: value.round_dp(precision),
            precision,
        })
    }

    /// Create a quantity inferring the precision from the value's scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative.
    pub fn from_decimal(value: Decimal) -> Result<Self, DomainError> {
        Self::new(value, value.scale())
    }

    /// Create a whole-unit quantity.
    ///
    /// # Panics
    ///
    /// Never panics; whole non-negative integers are always valid.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self {
            value: Decimal::from(units),
            precision: 0,
        }
    }

    /// Parse a quantity from its wire string representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid non-negative decimal.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let value: Decimal = s.parse().map_err(|_| DomainError::InvalidValue {
            field: "quantity".to_string(),
            message: format!("not a valid decimal: '{s}'"),
        })?;
        Self::from_decimal(value)
    }

    /// Zero quantity.
    pub const ZERO: Self = Self {
        value: Decimal::ZERO,
        precision: 0,
    };

    /// Get the inner decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// Get the decimal precision.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns true if this quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if this quantity is positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Add another quantity, keeping the receiver's precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the operand precision exceeds the receiver
    /// precision.
    pub fn checked_add(&self, other: &Self) -> Result<Self, DomainError> {
        self.check_precision(other)?;
        Self::new(self.value + other.value, self.precision)
    }

    /// Subtract another quantity, keeping the receiver's precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the operand precision exceeds the receiver
    /// precision, or if the result would be negative.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, DomainError> {
        self.check_precision(other)?;
        Self::new(self.value - other.value, self.precision)
    }

    fn check_precision(&self, other: &Self) -> Result<(), DomainError> {
        if other.precision > self.precision {
            return Err(DomainError::PrecisionMismatch {
                receiver: self.precision,
                operand: other.precision,
            });
        }
        Ok(())
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Quantity {}

impl Hash for Quantity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
