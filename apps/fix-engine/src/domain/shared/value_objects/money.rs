//! Money value object for currency amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::shared::DomainError;

/// ISO 4217 currency codes supported by the brokers we connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Australian dollar.
    Aud,
    /// Canadian dollar.
    Cad,
    /// Swiss franc.
    Chf,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
    /// New Zealand dollar.
    Nzd,
    /// United States dollar.
    Usd,
}

impl Currency {
    /// Parse a currency from its ISO code.
    ///
    /// # Errors
    ///
    /// Returns an error for unrecognized codes.
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        match code.to_ascii_uppercase().as_str() {
            "AUD" => Ok(Self::Aud),
            "CAD" => Ok(Self::Cad),
            "CHF" => Ok(Self::Chf),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "JPY" => Ok(Self::Jpy),
            "NZD" => Ok(Self::Nzd),
            "USD" => Ok(Self::Usd),
            other => Err(DomainError::InvalidValue {
                field: "currency".to_string(),
                message: format!("unrecognized currency code: '{other}'"),
            }),
        }
    }

    /// Get the ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Aud => "AUD",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Nzd => "NZD",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A signed monetary amount in a specific currency.
///
/// Rounded to two decimal places on construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Money {
    value: Decimal,
    currency: Currency,
}

impl Money {
    /// Display precision for monetary amounts.
    const PRECISION: u32 = 2;

    /// Create a new monetary amount.
    #[must_use]
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self {
            value: value.round_dp(Self::PRECISION),
            currency,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Parse a monetary amount from its wire string representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid decimal.
    pub fn parse(s: &str, currency: Currency) -> Result<Self, DomainError> {
        let value: Decimal = s.parse().map_err(|_| DomainError::InvalidValue {
            field: "money".to_string(),
            message: format!("not a valid decimal: '{s}'"),
        })?;
        Ok(Self::new(value, currency))
    }

    /// Get the inner decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// Get the currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if this amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Add another amount of the same currency.
    ///
    /// # Errors
    ///
    /// Returns an error on currency mismatch.
    pub fn checked_add(&self, other: &Self) -> Result<Self, DomainError> {
        self.check_currency(other)?;
        Ok(Self::new(self.value + other.value, self.currency))
    }

    /// Subtract another amount of the same currency.
    ///
    /// # Errors
    ///
    /// Returns an error on currency mismatch.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, DomainError> {
        self.check_currency(other)?;
        Ok(Self::new(self.value - other.value, self.currency))
    }

    fn check_currency(&self, other: &Self) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                left: self.currency.to_string(),
                right: other.currency.to_string(),
            });
        }
        Ok(())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency == other.currency && self.value == other.value
    }
}

impl Eq for Money {}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.currency.hash(state);
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.currency == other.currency {
            Some(self.value.cmp(&other.value))
        } else {
            None
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_new_rounds_to_cents() {
        let m = Money::new(dec!(100.555), Currency::Usd);
        assert_eq!(m.value(), dec!(100.56));
    }

    #[test]
    fn money_may_be_negative() {
        let m = Money::new(dec!(-25.00), Currency::Aud);
        assert!(m.is_negative());
    }

    #[test]
    fn money_arithmetic_same_currency() {
        let a = Money::new(dec!(100), Currency::Usd);
        let b = Money::new(dec!(40), Currency::Usd);
        assert_eq!(a.checked_add(&b).unwrap().value(), dec!(140));
        assert_eq!(a.checked_sub(&b).unwrap().value(), dec!(60));
    }

    #[test]
    fn money_currency_mismatch_fails() {
        let a = Money::new(dec!(100), Currency::Usd);
        let b = Money::new(dec!(40), Currency::Jpy);
        assert!(matches!(
            a.checked_add(&b),
            Err(DomainError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn money_cross_currency_not_ordered() {
        let a = Money::new(dec!(1), Currency::Usd);
        let b = Money::new(dec!(1), Currency::Eur);
        assert!(a.partial_cmp(&b).is_none());
        assert_ne!(a, b);
    }

    #[test]
    fn currency_parse_roundtrip() {
        for code in ["AUD", "CAD", "CHF", "EUR", "GBP", "JPY", "NZD", "USD"] {
            assert_eq!(Currency::parse(code).unwrap().code(), code);
        }
        assert!(Currency::parse("XXX").is_err());
    }

    #[test]
    fn money_display() {
        let m = Money::new(dec!(1500.5), Currency::Aud);
        assert_eq!(format!("{m}"), "1500.50 AUD");
    }
}
