//! Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging custom event
//! handlers (logging, metrics, audit) onto a queue's bus.
//!
//! ## Rules
//! - Each subscriber runs in its own worker task
//!   (see [`attach`](crate::subscribers::attach)); a slow subscriber lags and
//!   skips events, it never blocks the queue.
//! - Events are delivered in publish order per subscriber.

use async_trait::async_trait;

use crate::events::Event;

/// Consumer of queue lifecycle events.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's worker task, not in the publisher
    /// context. Events arrive in publish order.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in logs/metrics.
    ///
    /// Prefer short, descriptive names (e.g., "metrics", "audit").
    /// The default uses `type_name::<Self>()`, which can be verbose —
    /// override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
