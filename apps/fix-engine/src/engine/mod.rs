//! Execution engine: database, orchestration, gateway and publishing.

pub mod database;
#[allow(clippy::module_inception)]
pub mod engine;
pub mod gateway;
pub mod publisher;
pub mod runner;

pub use database::{DatabaseError, ExecutionDatabase, OrderIdentity};
pub use engine::{EngineCounters, ExecutionEngine};
pub use gateway::{GatewayError, TradingGateway};
pub use publisher::{ChannelPublisher, EventPublisher, NoOpPublisher};
pub use runner::{EngineHandle, EngineMessage, EngineRunner};
