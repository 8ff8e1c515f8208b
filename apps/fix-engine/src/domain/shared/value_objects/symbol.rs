//! Symbol value object for instrument identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// An internal trading symbol (e.g. "AUDUSD", "XAUUSD").
///
/// Internal symbols are uppercase alphanumeric. Broker-specific codes
/// (e.g. "AUD/USD") live on the other side of the symbol map and never
/// appear inside the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol, normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Validate the symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol is empty or contains characters
    /// other than ASCII alphanumerics.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.0.is_empty() {
            return Err(DomainError::InvalidValue {
                field: "symbol".to_string(),
                message: "symbol cannot be empty".to_string(),
            });
        }
        if !self.0.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidValue {
                field: "symbol".to_string(),
                message: format!("symbol contains invalid characters: '{}'", self.0),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_normalizes_case() {
        assert_eq!(Symbol::new("audusd").as_str(), "AUDUSD");
    }

    #[test]
    fn symbol_validate_rejects_empty() {
        assert!(Symbol::new("").validate().is_err());
    }

    #[test]
    fn symbol_validate_rejects_separator() {
        assert!(Symbol::new("AUD/USD").validate().is_err());
    }

    #[test]
    fn symbol_validate_valid() {
        assert!(Symbol::new("XAUUSD").validate().is_ok());
        assert!(Symbol::new("SPX500").validate().is_ok());
    }

    #[test]
    fn symbol_hash_dedup() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Symbol::new("AUDUSD"));
        set.insert(Symbol::new("audusd"));
        assert_eq!(set.len(), 1);
    }
}
