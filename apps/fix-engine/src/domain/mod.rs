//! Domain layer: value objects, aggregates, events and commands.
//!
//! Pure business logic with no I/O. Everything here is deterministic
//! and exercised heavily by unit tests.

pub mod account;
pub mod events;
pub mod market;
pub mod order;
pub mod position;
pub mod shared;

pub use events::Event;
