//! Volume value object for traded size aggregates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::shared::DomainError;

/// A non-negative traded volume with an explicit decimal precision.
///
/// Same discipline as [`super::Quantity`], kept as its own type so bar
/// volume and order quantity cannot be mixed up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Volume {
    value: Decimal,
    precision: u32,
}

impl Volume {
    /// Create a new volume at the given precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative.
    pub fn new(value: Decimal, precision: u32) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::NegativeValue {
                type_name: "Volume",
                value: value.to_string(),
            });
        }
        Ok(Self {
            value: value.round_dp(precision),
            precision,
        })
    }

    /// Create a volume inferring the precision from the value's scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative.
    pub fn from_decimal(value: Decimal) -> Result<Self, DomainError> {
        Self::new(value, value.scale())
    }

    /// Create a whole-unit volume.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self {
            value: Decimal::from(units),
            precision: 0,
        }
    }

    /// Zero volume.
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

    /// Returns true if this volume is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Add another volume, keeping the receiver's precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the operand precision exceeds the receiver
    /// precision.
    pub fn checked_add(&self, other: &Self) -> Result<Self, DomainError> {
        if other.precision > self.precision {
            return Err(DomainError::PrecisionMismatch {
                receiver: self.precision,
                operand: other.precision,
            });
        }
        Self::new(self.value + other.value, self.precision)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Volume {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Volume {}

impl Hash for Volume {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Volume {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Volume {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
