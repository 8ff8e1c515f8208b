//! Configuration loading and validation.
//!
//! Everything the process needs at startup comes from one YAML file:
//! identity context, the FIX session schedule, bar subscriptions and
//! the data-trim window.

use std::path::PathBuf;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::market::{BarAggregation, BarSpecification, BarType, PriceType};
use crate::domain::shared::Symbol;
use crate::scheduler::WeeklyTime;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the YAML.
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// The parsed configuration is inconsistent.
    #[error("config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Identity context for submitted orders.
    pub trader: TraderConfig,
    /// FIX session configuration.
    pub fix: FixConfig,
    /// Bar pipeline configuration.
    #[serde(default)]
    pub data: DataConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity context for submitted orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Trader id, e.g. `TESTER-000`.
    pub trader_id: String,
    /// Broker account id.
    pub account_id: String,
}

/// FIX session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixConfig {
    /// Path to the static instrument table CSV.
    pub instrument_table: PathBuf,
    /// Weekly session connect time, UTC.
    #[serde(default = "default_connect")]
    pub connect: WeeklyTime,
    /// Weekly session disconnect time, UTC.
    #[serde(default = "default_disconnect")]
    pub disconnect: WeeklyTime,
}

/// Bar pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataConfig {
    /// Bar types subscribed at startup.
    #[serde(default)]
    pub subscriptions: Vec<BarSubscription>,
    /// Rolling trim job configuration.
    #[serde(default)]
    pub trim: TrimConfig,
}

/// One subscribed bar series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarSubscription {
    /// Internal symbol, e.g. `AUDUSD`.
    pub symbol: String,
    /// Window length.
    pub period: u32,
    /// Roll-up structure.
    pub aggregation: BarAggregation,
    /// Side of the book.
    pub price_type: PriceType,
}

impl BarSubscription {
    /// The aggregation key this subscription describes.
    #[must_use]
    pub fn bar_type(&self) -> BarType {
        BarType {
            symbol: Symbol::new(&self.symbol),
            specification: BarSpecification {
                period: self.period,
                aggregation: self.aggregation,
                price_type: self.price_type,
            },
        }
    }
}

/// Rolling bar-trim job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Days of bar data to retain.
    pub window_days: i64,
    /// When the weekly trim runs, UTC.
    pub at: WeeklyTime,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            // Sunday 00:01 UTC, just after the trading week rolls over.
            at: WeeklyTime {
                weekday: Weekday::Sun,
                time: NaiveTime::from_hms_opt(0, 1, 0).unwrap_or_default(),
            },
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter, overridable via `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_connect() -> WeeklyTime {
    WeeklyTime {
        weekday: Weekday::Sun,
        time: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
    }
}

fn default_disconnect() -> WeeklyTime {
    WeeklyTime {
        weekday: Weekday::Fri,
        time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
    }
}

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or
/// validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;
    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml_bw::from_str(yaml)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.trader.trader_id.is_empty() {
        return Err(ConfigError::ValidationError(
            "trader.trader_id must not be empty".to_string(),
        ));
    }
    if config.trader.account_id.is_empty() {
        return Err(ConfigError::ValidationError(
            "trader.account_id must not be empty".to_string(),
        ));
    }
    if config.data.trim.window_days <= 0 {
        return Err(ConfigError::ValidationError(
            "data.trim.window_days must be positive".to_string(),
        ));
    }
    for subscription in &config.data.subscriptions {
        if subscription.period == 0 {
            return Err(ConfigError::ValidationError(format!(
                "data.subscriptions: zero period for {}",
                subscription.symbol
            )));
        }
    }
    Ok(())
}
