//! Single-threaded engine actor loop.
//!
//! All commands and events funnel through one channel and are processed
//! strictly in arrival order, which is what makes the per-order and
//! per-position invariants hold without locks.

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::engine::ExecutionEngine;
use crate::domain::events::Event;
use crate::domain::order::TradingCommand;

const PROGRESS_INTERVAL: u64 = 10_000;

/// One unit of work for the engine.
#[derive(Debug, Clone)]
pub enum EngineMessage {
    /// A strategy command.
    Command(TradingCommand),
    /// A translated broker event.
    Event(Event),
}

/// Cloneable submission handle for producers.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: mpsc::UnboundedSender<EngineMessage>,
}

impl EngineHandle {
    /// Submit a command; returns false if the engine has shut down.
    pub fn execute(&self, command: TradingCommand) -> bool {
        self.sender.send(EngineMessage::Command(command)).is_ok()
    }

    /// Submit an event; returns false if the engine has shut down.
    pub fn apply(&self, event: Event) -> bool {
        self.sender.send(EngineMessage::Event(event)).is_ok()
    }
}

/// Owns the engine and drains its inbound queue.
#[derive(Debug)]
pub struct EngineRunner {
    engine: ExecutionEngine,
    receiver: mpsc::UnboundedReceiver<EngineMessage>,
}

impl EngineRunner {
    /// Create the runner and the handle producers use to reach it.
    #[must_use]
    pub fn new(engine: ExecutionEngine) -> (Self, EngineHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { engine, receiver }, EngineHandle { sender })
    }

    /// Process messages until every handle is dropped, then return the
    /// engine for final inspection.
    pub async fn run(mut self) -> ExecutionEngine {
        info!("execution engine started");
        let mut processed: u64 = 0;
        while let Some(message) = self.receiver.recv().await {
            match message {
                EngineMessage::Command(command) => self.engine.execute(command),
                EngineMessage::Event(event) => self.engine.apply(event),
            }
            processed += 1;
            if processed % PROGRESS_INTERVAL == 0 {
                debug!(processed, counters = ?self.engine.counters(), "engine progress");
            }
        }
        let counters = self.engine.counters();
        info!(
            processed,
            commands = counters.commands,
            events_applied = counters.events_applied,
            duplicates = counters.duplicate_commands,
            dropped = counters.events_dropped,
            "execution engine stopped",
        );
        self.engine
    }
}
