//! FIX Execution Engine Binary
//!
//! Wires the configuration, instrument table, translator, router,
//! aggregation pipeline and execution engine together and runs until
//! interrupted.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin fix-engine -- config.yaml
//! ```
//!
//! The FIX session library itself is an external collaborator; the
//! binary installs a logging session so the full outbound path can be
//! exercised without broker connectivity.

use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info};

use fix_engine::config;
use fix_engine::data::store::BarStore;
use fix_engine::data::{AggregationController, InMemoryBarStore, instruments};
use fix_engine::domain::events::Event;
use fix_engine::domain::shared::Timestamp;
use fix_engine::engine::{ChannelPublisher, EngineRunner, ExecutionEngine, TradingGateway};
use fix_engine::fix::{FixRouter, FixSession, OutboundFixMessage};
use fix_engine::scheduler::WeeklyTime;
use fix_engine::telemetry;

/// Stand-in for the external session library: logs every outbound
/// message instead of transmitting it.
struct LoggingFixSession;

impl FixSession for LoggingFixSession {
    fn send(
        &self,
        message: OutboundFixMessage,
    ) -> Result<(), fix_engine::engine::GatewayError> {
        info!(?message, "outbound message");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = config::load_config(config_path.as_deref()).context("loading configuration")?;

    telemetry::init(&config.logging.level);
    info!(trader_id = %config.trader.trader_id, "starting fix-engine");

    let instruments = instruments::load_instruments(&config.fix.instrument_table)
        .context("loading instrument table")?;
    let symbol_map = Arc::new(instruments::symbol_map(&instruments));

    let gateway: Arc<dyn TradingGateway> =
        Arc::new(FixRouter::new(Arc::new(LoggingFixSession), symbol_map));

    let (publisher, mut published) = ChannelPublisher::new();
    tokio::spawn(async move {
        while let Some(event) = published.recv().await {
            debug!(event_id = %event.event_id(), "republished event");
        }
    });

    let engine = ExecutionEngine::new(gateway, Box::new(publisher));
    let (runner, handle) = EngineRunner::new(engine);
    let runner_task = tokio::spawn(runner.run());

    // Bar pipeline: configured subscriptions feed completed bars back
    // into the engine stream and the rolling store.
    let mut controller = AggregationController::new();
    let (bar_tx, mut bar_rx) = mpsc::unbounded_channel();
    controller.register_receiver(bar_tx);
    for subscription in &config.data.subscriptions {
        controller
            .subscribe(subscription.bar_type())
            .with_context(|| format!("subscribing {}", subscription.bar_type()))?;
    }
    let store = Arc::new(Mutex::new(InMemoryBarStore::new()));
    let bar_store = store.clone();
    let bar_handle = handle.clone();
    tokio::spawn(async move {
        while let Some(event) = bar_rx.recv().await {
            bar_store
                .lock()
                .add_bar(&event.bar_type, event.bar.clone());
            bar_handle.apply(Event::BarData(event));
        }
    });

    spawn_trim_job(
        store,
        config.data.trim.at,
        config.data.trim.window_days,
        config
            .data
            .subscriptions
            .iter()
            .map(|s| s.bar_type().specification)
            .collect(),
    );
    log_session_schedule(&config.fix.connect, &config.fix.disconnect);

    signal::ctrl_c().await.context("waiting for shutdown")?;
    info!("shutdown requested");

    drop(handle);
    drop(controller);
    let engine = runner_task.await.context("engine task panicked")?;
    info!(counters = ?engine.counters(), "fix-engine stopped");
    Ok(())
}

/// Weekly bar-trim job. Each firing re-arms the next occurrence.
fn spawn_trim_job(
    store: Arc<Mutex<InMemoryBarStore>>,
    at: WeeklyTime,
    window_days: i64,
    specifications: Vec<fix_engine::domain::market::BarSpecification>,
) {
    tokio::spawn(async move {
        loop {
            let now = Timestamp::now();
            let fire_at = at.next_after(now);
            let delay = (fire_at.as_datetime() - now.as_datetime())
                .to_std()
                .unwrap_or_default();
            tokio::time::sleep(delay).await;
            let pruned =
                store
                    .lock()
                    .trim_to_window(&specifications, window_days, Timestamp::now());
            info!(pruned, "weekly bar trim complete");
        }
    });
}

fn log_session_schedule(connect: &WeeklyTime, disconnect: &WeeklyTime) {
    let now = Timestamp::now();
    info!(
        connect = %connect.next_after(now),
        disconnect = %disconnect.next_after(now),
        "session schedule armed",
    );
}
