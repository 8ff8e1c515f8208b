//! Price value object with explicit decimal precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::shared::DomainError;

/// A non-negative quoted price with an explicit decimal precision.
///
/// Broker feeds mix precisions (pips vs points), so the precision is
/// carried alongside the value and checked on arithmetic instead of
/// silently truncating.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Price {
    value: Decimal,
    precision: u32,
}

impl Price {
    /// Create a new price at the given precision.
    ///
    /// The value is rescaled to `precision` decimal places.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative.
    pub fn new(value: Decimal, precision: u32) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::NegativeValue {
                type_name: "Price",
                value: value.to_string(),
            });
        }
        Ok(Self {
            value: value.round_dp(precision),
            precision,
        })
    }

    /// Create a price inferring the precision from the value's scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative.
    pub fn from_decimal(value: Decimal) -> Result<Self, DomainError> {
        Self::new(value, value.scale())
    }

    /// Parse a price from its wire string representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid non-negative decimal.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let value: Decimal = s.parse().map_err(|_| DomainError::InvalidValue {
            field: "price".to_string(),
            message: format!("not a valid decimal: '{s}'"),
        })?;
        Self::from_decimal(value)
    }

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

    /// Returns true if this price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Add another price, keeping the receiver's precision.
    ///
    /// # Errors
    ///
    /// Returns an error if the operand precision exceeds the receiver
    /// precision.
    pub fn checked_add(&self, other: &Self) -> Result<Self, DomainError> {
        self.check_precision(other)?;
        Self::new(self.value + other.value, self.precision)
    }

    /// Subtract another price, keeping the receiver's precision.
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

// Equality, ordering and hashing compare the normalized value only:
// 1.10 at precision 2 equals 1.1 at precision 1.
impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Price {}

impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_new_rescales() {
        let p = Price::new(dec!(1.2), 5).unwrap();
        assert_eq!(p.value(), dec!(1.20000));
        assert_eq!(p.precision(), 5);
    }

    #[test]
    fn price_from_decimal_infers_precision() {
        let p = Price::from_decimal(dec!(1.20500)).unwrap();
        assert_eq!(p.precision(), 5);
    }

    #[test]
    fn price_rejects_negative() {
        assert!(Price::new(dec!(-0.0001), 4).is_err());
    }

    #[test]
    fn price_parse() {
        let p = Price::parse("1.20000").unwrap();
        assert_eq!(p.value(), dec!(1.20000));
        assert_eq!(p.precision(), 5);
    }

    #[test]
    fn price_parse_malformed() {
        assert!(Price::parse("1.2x").is_err());
        assert!(Price::parse("").is_err());
    }

    #[test]
    fn price_checked_add() {
        let a = Price::new(dec!(1.20000), 5).unwrap();
        let b = Price::new(dec!(0.001), 3).unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.value(), dec!(1.20100));
        assert_eq!(sum.precision(), 5);
    }

    #[test]
    fn price_add_rejects_higher_operand_precision() {
        let a = Price::new(dec!(1.20), 2).unwrap();
        let b = Price::new(dec!(0.00001), 5).unwrap();
        assert!(matches!(
            a.checked_add(&b),
            Err(DomainError::PrecisionMismatch { receiver: 2, operand: 5 })
        ));
    }

    #[test]
    fn price_sub_below_zero_fails() {
        let a = Price::new(dec!(1.0), 1).unwrap();
        let b = Price::new(dec!(2.0), 1).unwrap();
        assert!(matches!(
            a.checked_sub(&b),
            Err(DomainError::NegativeValue { .. })
        ));
    }

    #[test]
    fn price_equality_ignores_precision() {
        let a = Price::new(dec!(1.10), 2).unwrap();
        let b = Price::new(dec!(1.1), 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn price_hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Price::new(dec!(1.10), 2).unwrap());
        set.insert(Price::new(dec!(1.1), 1).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn price_ordering() {
        let a = Price::parse("1.19999").unwrap();
        let b = Price::parse("1.2").unwrap();
        assert!(a < b);
    }

    #[test]
    fn price_display() {
        let p = Price::new(dec!(1.20000), 5).unwrap();
        assert_eq!(format!("{p}"), "1.20000");
    }
}
