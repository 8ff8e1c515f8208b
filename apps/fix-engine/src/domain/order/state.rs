//! Order lifecycle states and the legal transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order state in the lifecycle.
///
/// `Initialized -> Submitted -> Accepted -> Working <-> PartiallyFilled`
/// with `Filled`, `Cancelled`, `Rejected` and `Expired` as terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    /// Created locally, not yet forwarded to the broker.
    Initialized,
    /// Forwarded to the broker, awaiting acknowledgment.
    Submitted,
    /// Acknowledged by the broker.
    Accepted,
    /// Resting in the market, eligible for fills/cancels/modifies.
    Working,
    /// Partially filled, remainder still working.
    PartiallyFilled,
    /// Completely filled.
    Filled,
    /// Cancelled.
    Cancelled,
    /// Rejected or denied before reaching the market.
    Rejected,
    /// Expired by its time in force.
    Expired,
}

impl OrderState {
    /// Returns true if the order is in a terminal state.
    ///
    /// Terminal states absorb all further events.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Filled | Self::Cancelled | Self::Rejected | Self::Expired
        )
    }

    /// Returns true if the order is working in the market.
    #[must_use]
    pub const fn is_working(&self) -> bool {
        matches!(self, Self::Working | Self::PartiallyFilled)
    }

    /// Check whether a transition is legal.
    ///
    /// Some brokers skip the explicit acknowledgment, so `Submitted` may
    /// move straight to `Working`.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            // From Initialized
            (Self::Initialized, Self::Submitted)
                | (Self::Initialized, Self::Rejected)
                // From Submitted
                | (Self::Submitted, Self::Accepted)
                | (Self::Submitted, Self::Working)
                | (Self::Submitted, Self::Rejected)
                | (Self::Submitted, Self::Cancelled)
                | (Self::Submitted, Self::Expired)
                // From Accepted
                | (Self::Accepted, Self::Working)
                | (Self::Accepted, Self::PartiallyFilled)
                | (Self::Accepted, Self::Filled)
                | (Self::Accepted, Self::Cancelled)
                | (Self::Accepted, Self::Rejected)
                | (Self::Accepted, Self::Expired)
                // From Working (self-loop covers modifications)
                | (Self::Working, Self::Working)
                | (Self::Working, Self::PartiallyFilled)
                | (Self::Working, Self::Filled)
                | (Self::Working, Self::Cancelled)
                | (Self::Working, Self::Expired)
                // From PartiallyFilled
                | (Self::PartiallyFilled, Self::PartiallyFilled)
                | (Self::PartiallyFilled, Self::Filled)
                | (Self::PartiallyFilled, Self::Cancelled)
                | (Self::PartiallyFilled, Self::Expired)
        )
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialized => write!(f, "INITIALIZED"),
            Self::Submitted => write!(f, "SUBMITTED"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Working => write!(f, "WORKING"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}
