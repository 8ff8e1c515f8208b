//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(OrderId, "System-assigned identifier for an order. Immutable.");
define_id!(
    BrokerOrderId,
    "Broker's identifier for an order, with its decoration suffix stripped."
);
define_id!(
    PositionId,
    "Caller-supplied identifier grouping the orders of one position."
);
define_id!(AccountId, "Identifier for a brokerage account.");
define_id!(TraderId, "Identifier for a trader.");
define_id!(StrategyId, "Identifier for a trading strategy.");
define_id!(ExecutionId, "Broker's identifier for a single execution (fill).");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_new_and_display() {
        let id = OrderId::new("O-19700101-000000-001-001-1");
        assert_eq!(id.as_str(), "O-19700101-000000-001-001-1");
        assert_eq!(format!("{id}"), "O-19700101-000000-001-001-1");
    }

    #[test]
    fn ids_are_distinct_types() {
        // Compiles only because each id is its own type.
        let order: OrderId = "O-1".into();
        let position: PositionId = "P-1".into();
        assert_eq!(order.as_str(), "O-1");
        assert_eq!(position.as_str(), "P-1");
    }

    #[test]
    fn id_equality() {
        assert_eq!(TraderId::new("TESTER-000"), TraderId::new("TESTER-000"));
        assert_ne!(TraderId::new("TESTER-000"), TraderId::new("TESTER-001"));
    }

    #[test]
    fn id_into_inner() {
        let id = StrategyId::new("EMACross-001");
        assert_eq!(id.into_inner(), "EMACross-001");
    }

    #[test]
    fn id_hash_works() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(AccountId::new("FXCM-123"));
        set.insert(AccountId::new("FXCM-123"));
        assert_eq!(set.len(), 1);
    }
}
