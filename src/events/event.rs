//! Lifecycle events emitted by the admission queue.
//!
//! The [`EventKind`] enum follows the work-item state machine: an item is
//! enqueued, then either started and finished, or cancelled while it still
//! waits. Submissions refused at the pending ceiling surface as `Rejected`.
//!
//! The [`Event`] struct carries the item id plus queue counters sampled at
//! publish time, so a log line or metric can show the backlog without calling
//! back into the queue.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! consumed out of order.
//!
//! ## Example
//! ```rust
//! use floodgate::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Cancelled).with_depth(3);
//!
//! assert_eq!(ev.kind, EventKind::Cancelled);
//! assert_eq!(ev.depth, Some(3));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::queue::ItemId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of queue lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Item accepted and appended to the pending queue.
    ///
    /// Sets:
    /// - `item`: the new item's id
    /// - `depth`: pending count after the append
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Enqueued,

    /// Item promoted to running; its continuation is about to be invoked.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `active`: running count including this item
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Started,

    /// Item's completion settled; its slot has been freed.
    ///
    /// Emitted whether the handler performed its terminating write or bailed
    /// out early — settlement is guaranteed either way.
    ///
    /// Sets:
    /// - `item`: item id
    /// - `active`: running count after the release
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Finished,

    /// Item removed from the pending queue before it ever ran
    /// (client disconnected, or an explicit `cancel`).
    ///
    /// Sets:
    /// - `item`: item id
    /// - `depth`: pending count after the removal
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Cancelled,

    /// Submission refused: the pending queue sits at its configured ceiling.
    ///
    /// Sets:
    /// - `depth`: pending count at the time of refusal
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Rejected,
}

/// Queue lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Event classification.
    pub kind: EventKind,
    /// Work item the event refers to, if any.
    pub item: Option<ItemId>,
    /// Pending count sampled when the event was published.
    pub depth: Option<usize>,
    /// Running count sampled when the event was published.
    pub active: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            item: None,
            depth: None,
            active: None,
        }
    }

    /// Attaches a work item id.
    #[inline]
    pub fn with_item(mut self, id: ItemId) -> Self {
        self.item = Some(id);
        self
    }

    /// Attaches the pending count.
    #[inline]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Attaches the running count.
    #[inline]
    pub fn with_active(mut self, active: usize) -> Self {
        self.active = Some(active);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::Enqueued);
        let b = Event::new(EventKind::Started);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::Started)
            .with_item(ItemId(7))
            .with_active(2);
        assert_eq!(ev.item, Some(ItemId(7)));
        assert_eq!(ev.active, Some(2));
        assert_eq!(ev.depth, None);
    }
}
