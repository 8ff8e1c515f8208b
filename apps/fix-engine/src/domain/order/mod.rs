//! Order aggregate: lifecycle state machine, events and commands.

mod bracket;
mod commands;
mod errors;
pub mod events;
#[allow(clippy::module_inception)]
mod order;
mod state;
mod types;

pub use bracket::BracketOrder;
pub use commands::{
    AccountInquiry, CancelOrder, ModifyOrder, SubmitBracketOrder, SubmitOrder, TradingCommand,
};
pub use errors::OrderError;
pub use events::OrderEvent;
pub use order::{Order, OrderParams};
pub use state::OrderState;
pub use types::{OrderSide, OrderType, TimeInForce};
