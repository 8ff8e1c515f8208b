//! Shared domain kernel: value objects, identifiers and errors.

mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{
    AccountId, BrokerOrderId, Currency, ExecutionId, Money, OrderId, PositionId, Price, Quantity,
    StrategyId, Symbol, Timestamp, TraderId, Volume,
};
