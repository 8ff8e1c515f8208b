//! Data pipeline: tick aggregation into bars, static instrument tables,
//! and rolling bar storage.

pub mod aggregator;
pub mod builder;
pub mod controller;
pub mod instruments;
pub mod store;

pub use aggregator::{BarAggregator, TickBarAggregator, TimeBarAggregator};
pub use builder::BarBuilder;
pub use controller::AggregationController;
pub use instruments::{Instrument, load_instruments};
pub use store::{BarStore, InMemoryBarStore};
