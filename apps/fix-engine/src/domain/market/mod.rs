//! Market data types: quote ticks and OHLCV bars.

mod bar;
mod tick;

pub use bar::{Bar, BarAggregation, BarSpecification, BarType};
pub use tick::{PriceType, QuoteTick};
