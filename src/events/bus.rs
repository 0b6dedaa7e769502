//! Broadcast bus for queue lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that lets the
//! admission queue publish lifecycle events without blocking on consumers.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls
//!   `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all
//!   receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip the
//!   `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at
//!   send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for queue lifecycle events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] providing a `publish`/`subscribe`
/// API. The queue publishes; any number of receivers observe clones of each
/// event.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// ### Notes
    /// - Capacity is **shared** across all receivers (not per-subscriber).
    /// - When receivers lag, they observe `RecvError::Lagged`.
    /// - The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no receivers, the event is dropped; this function still
    /// returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// - Each call creates an **independent** receiver.
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers get `RecvError::Lagged(n)` and skip over missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_subscriber_sees_events_in_order() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::Enqueued));
        bus.publish(Event::new(EventKind::Started));

        let first = rx.recv().await.expect("first event");
        let second = rx.recv().await.expect("second event");
        assert_eq!(first.kind, EventKind::Enqueued);
        assert_eq!(second.kind, EventKind::Started);
        assert!(second.seq > first.seq);
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(4);
        // No receiver subscribed; publish must not fail or block.
        bus.publish(Event::new(EventKind::Rejected));
    }
}
