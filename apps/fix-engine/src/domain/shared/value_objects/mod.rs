//! Value objects shared across the domain.

mod identifiers;
mod money;
mod price;
mod quantity;
mod symbol;
mod timestamp;
mod volume;

pub use identifiers::{
    AccountId, BrokerOrderId, ExecutionId, OrderId, PositionId, StrategyId, TraderId,
};
pub use money::{Currency, Money};
pub use price::Price;
pub use quantity::Quantity;
pub use symbol::Symbol;
pub use timestamp::Timestamp;
pub use volume::Volume;
