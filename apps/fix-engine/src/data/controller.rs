//! Tick routing and bar fan-out.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::aggregator::{AggregationError, BarAggregator};
use crate::domain::events::BarDataEvent;
use crate::domain::market::{BarSpecification, BarType, QuoteTick};
use crate::domain::shared::{Symbol, Timestamp};

/// Subscription failures.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// The bar type is already subscribed.
    #[error("already subscribed: {bar_type}")]
    AlreadySubscribed {
        /// Display form of the duplicate bar type.
        bar_type: String,
    },
    /// The aggregator could not be constructed.
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// Routes inbound ticks to per-symbol aggregators and fans completed
/// bars out to registered receivers.
///
/// Aggregators are created lazily on first subscription for a symbol;
/// adding or removing one specification never disturbs the builders of
/// the others.
#[derive(Debug, Default)]
pub struct AggregationController {
    aggregators: HashMap<Symbol, HashMap<BarSpecification, BarAggregator>>,
    receivers: Vec<mpsc::UnboundedSender<BarDataEvent>>,
}

impl AggregationController {
    /// Create a controller with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a receiver for every completed bar.
    pub fn register_receiver(&mut self, sender: mpsc::UnboundedSender<BarDataEvent>) {
        self.receivers.push(sender);
    }

    /// Subscribe a new bar type, creating its aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if the bar type is already subscribed or its
    /// specification is invalid.
    pub fn subscribe(&mut self, bar_type: BarType) -> Result<(), SubscriptionError> {
        let per_symbol = self.aggregators.entry(bar_type.symbol.clone()).or_default();
        if per_symbol.contains_key(&bar_type.specification) {
            return Err(SubscriptionError::AlreadySubscribed {
                bar_type: bar_type.to_string(),
            });
        }
        debug!(%bar_type, "subscribing bar type");
        let spec = bar_type.specification;
        per_symbol.insert(spec, BarAggregator::for_bar_type(bar_type)?);
        Ok(())
    }

    /// Unsubscribe a bar type, dropping its aggregator and any
    /// partially accumulated window.
    ///
    /// Unknown subscriptions are a logged no-op.
    pub fn unsubscribe(&mut self, bar_type: &BarType) {
        let removed = self
            .aggregators
            .get_mut(&bar_type.symbol)
            .and_then(|per_symbol| per_symbol.remove(&bar_type.specification));
        if removed.is_none() {
            warn!(%bar_type, "unsubscribe for unknown bar type");
        } else {
            debug!(%bar_type, "unsubscribed bar type");
        }
    }

    /// Currently subscribed bar types.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<BarType> {
        self.aggregators
            .values()
            .flat_map(|per_symbol| per_symbol.values().map(|agg| agg.bar_type().clone()))
            .collect()
    }

    /// Route one tick to the symbol's aggregators and forward every
    /// completed bar; returns the completed bars for callers that want
    /// them directly.
    pub fn on_tick(&mut self, tick: &QuoteTick) -> Vec<BarDataEvent> {
        let Some(per_symbol) = self.aggregators.get_mut(&tick.symbol) else {
            return Vec::new();
        };
        let mut completed = Vec::new();
        for aggregator in per_symbol.values_mut() {
            if let Some(bar) = aggregator.on_tick(tick) {
                completed.push(BarDataEvent {
                    bar_type: aggregator.bar_type().clone(),
                    bar,
                    event_id: Uuid::new_v4(),
                    timestamp: Timestamp::now(),
                });
            }
        }
        for event in &completed {
            for receiver in &self.receivers {
                if receiver.send(event.clone()).is_err() {
                    warn!(bar_type = %event.bar_type, "bar receiver dropped");
                }
            }
        }
        completed
    }
}
