//! Republishing of applied events to downstream subscribers.

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::events::Event;

/// Receives every event the engine applies, in processing order.
pub trait EventPublisher: Send {
    /// Publish one applied event. Delivery is at-least-once; failures
    /// are the implementation's problem and must not stall the engine.
    fn publish(&self, event: Event);
}

/// Discards every event. Useful for tests and tooling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPublisher;

impl EventPublisher for NoOpPublisher {
    fn publish(&self, _event: Event) {}
}

/// Publishes events onto an unbounded channel, preserving order.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::UnboundedSender<Event>,
}

impl ChannelPublisher {
    /// Create a publisher and the receiving half for subscribers.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventPublisher for ChannelPublisher {
    fn publish(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!("event subscriber dropped; event discarded");
        }
    }
}
