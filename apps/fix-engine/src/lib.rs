// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! FIX Execution Engine - Core Library
//!
//! Deterministic execution layer between strategy code and a FIX broker
//! session: commands in, broker events applied, consistent state out.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: aggregates and value objects (orders, positions,
//!   accounts, bars, precision-tracked decimals)
//! - **FIX**: wire message translation and routing at the session
//!   boundary
//! - **Data**: tick-to-bar aggregation, instrument tables, bar storage
//! - **Engine**: the single-threaded command/event orchestrator and its
//!   in-memory execution database
//! - **Scheduler/Config/Telemetry**: weekly session jobs, YAML
//!   configuration, tracing setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fix;
pub mod scheduler;
pub mod telemetry;

pub use config::{Config, load_config};
pub use domain::events::Event;
pub use engine::{EngineHandle, EngineRunner, ExecutionEngine};
pub use fix::{FixRouter, FixTranslator, SymbolMap};
