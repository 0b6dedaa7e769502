//! The scheduling engine: slots, pending backlog, dispatch step.
//!
//! ## Architecture
//! ```text
//!  submit(job) ──► pending (FIFO) ──► dispatch ──► job(SlotGuard)
//!                      │                 ▲              │
//!  cancel(id) ─────────┘                 │              ▼
//!   (queued only)                        └── release ◄─ settle
//!                                            (finish or guard drop)
//! ```
//!
//! ## Rules
//! - All bookkeeping (`pending`, `active`) lives behind **one** mutex;
//!   submissions, settlements and cancellations may arrive from any task or
//!   thread and are serialized there.
//! - Jobs are invoked **outside** the lock, so a job that settles
//!   synchronously re-enters the dispatch step without deadlocking.
//! - A cancel racing a promotion is decided by lock order: once dispatch has
//!   popped the item, the cancel no longer finds it in `pending` and becomes
//!   a no-op. Deterministic, never index arithmetic against a moving list.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::config::QueueConfig;
use crate::error::{ConfigError, SubmitError};
use crate::events::{Bus, Event, EventKind};

use super::item::{ItemId, Job, Outcome, SlotGuard, Ticket};

/// A queued work item: its continuation plus the settlement channels.
struct PendingItem {
    id: ItemId,
    job: Job,
    done: oneshot::Sender<Outcome>,
    settled: CancellationToken,
}

/// Mutable queue state; every mutation goes through this struct under the
/// one mutex.
struct Inner {
    pending: VecDeque<PendingItem>,
    active: usize,
    next_id: u64,
}

/// Bounded-concurrency FIFO admission queue.
///
/// Up to `capacity` items run concurrently; the rest wait in submission
/// order. An item is *running* from the moment its job is invoked until its
/// [`SlotGuard`] settles — which is tied to the response being fully written,
/// not to the handler function returning (see
/// [`EndSignal`](crate::EndSignal)).
///
/// ### Guarantees
/// - **FIFO dispatch**: items start strictly in submission order, skipping
///   only items cancelled while queued.
/// - **No idle slots**: after any state-mutating call returns, either
///   `active == capacity` or the backlog is empty.
/// - **Guaranteed release**: a slot is freed exactly once per running item,
///   even if the handler never performs its terminating write.
pub struct AdmissionQueue {
    capacity: usize,
    max_pending: Option<usize>,
    inner: Mutex<Inner>,
    bus: Bus,
    // Handed to guards and tickets so they can reach back without keeping
    // the queue alive on their own.
    self_ref: Weak<Self>,
}

impl AdmissionQueue {
    /// Creates a queue from the given configuration.
    ///
    /// Fails with [`ConfigError::ZeroCapacity`] if `config.capacity == 0`.
    pub fn new(config: QueueConfig) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;
        Ok(Arc::new_cyclic(|me| Self {
            capacity: config.capacity,
            max_pending: config.max_pending,
            inner: Mutex::new(Inner {
                pending: VecDeque::new(),
                active: 0,
                next_id: 0,
            }),
            bus: Bus::new(config.bus_capacity),
            self_ref: me.clone(),
        }))
    }

    /// Appends a job to the pending queue and runs the dispatch step.
    ///
    /// Never blocks: the job is invoked either during this call (a slot was
    /// free) or later, when a running item settles. Fails fast with
    /// [`SubmitError::Full`] when a `max_pending` ceiling is configured and
    /// the backlog sits at it.
    pub fn submit(&self, job: Job) -> Result<Ticket, SubmitError> {
        let (done_tx, done_rx) = oneshot::channel();
        let settled = CancellationToken::new();

        let enqueued = {
            let mut inner = self.lock();
            if let Some(limit) = self.max_pending {
                if inner.pending.len() >= limit {
                    let depth = inner.pending.len();
                    drop(inner);
                    self.bus
                        .publish(Event::new(EventKind::Rejected).with_depth(depth));
                    return Err(SubmitError::Full { limit });
                }
            }
            let id = ItemId(inner.next_id);
            inner.next_id += 1;
            inner.pending.push_back(PendingItem {
                id,
                job,
                done: done_tx,
                settled: settled.clone(),
            });
            (id, inner.pending.len())
        };

        let (id, depth) = enqueued;
        self.bus
            .publish(Event::new(EventKind::Enqueued).with_item(id).with_depth(depth));
        self.dispatch();

        Ok(Ticket {
            id,
            queue: self.self_ref.clone(),
            done: done_rx,
            settled,
        })
    }

    /// Cancels the item with the given id if it is still queued.
    ///
    /// Removes it from the backlog and settles its completion as
    /// [`Outcome::Cancelled`]. `active` is untouched (the item never held a
    /// slot) and no dispatch runs (capacity is unaffected).
    ///
    /// Returns `false` for items already running or settled: a started
    /// handler runs to completion even if its client left.
    pub fn cancel(&self, id: ItemId) -> bool {
        let removed = {
            let mut inner = self.lock();
            let pos = inner.pending.iter().position(|p| p.id == id);
            match pos {
                Some(pos) => {
                    let item = inner.pending.remove(pos);
                    item.map(|item| (item, inner.pending.len()))
                }
                None => None,
            }
        };

        let Some((item, depth)) = removed else {
            return false;
        };

        let _ = item.done.send(Outcome::Cancelled);
        item.settled.cancel();
        self.bus
            .publish(Event::new(EventKind::Cancelled).with_item(id).with_depth(depth));
        true
    }

    /// Current pending (queued, not yet running) count.
    pub fn depth(&self) -> usize {
        self.lock().pending.len()
    }

    /// Current running count.
    pub fn active(&self) -> usize {
        self.lock().active
    }

    /// Maximum concurrently running items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured pending ceiling, if any.
    pub fn max_pending(&self) -> Option<usize> {
        self.max_pending
    }

    /// The lifecycle event bus.
    ///
    /// Subscribe before submitting if you need to observe a full lifecycle;
    /// the bus does not replay.
    pub fn events(&self) -> &Bus {
        &self.bus
    }

    /// Frees the slot held by `id` and re-runs the dispatch step.
    ///
    /// Called from [`SlotGuard`] on settlement, possibly from inside a job
    /// invocation; the lock is released before dispatch re-acquires it.
    pub(crate) fn release(&self, id: ItemId) {
        let active = {
            let mut inner = self.lock();
            debug_assert!(inner.active > 0, "release without a running item");
            inner.active = inner.active.saturating_sub(1);
            inner.active
        };
        self.bus
            .publish(Event::new(EventKind::Finished).with_item(id).with_active(active));
        self.dispatch();
    }

    /// The dispatch step: promote queued items while capacity allows.
    ///
    /// Pops under the lock, invokes outside it. Promotion marks the item
    /// running (increments `active`) before the job sees its guard, so a
    /// synchronous settle inside the job observes consistent bookkeeping.
    fn dispatch(&self) {
        loop {
            let next = {
                let mut inner = self.lock();
                if inner.active >= self.capacity {
                    return;
                }
                let Some(item) = inner.pending.pop_front() else {
                    return;
                };
                inner.active += 1;
                (item, inner.active)
            };

            let (item, active) = next;
            self.bus
                .publish(Event::new(EventKind::Started).with_item(item.id).with_active(active));
            let guard = SlotGuard::new(self.self_ref.clone(), item.id, item.done, item.settled);
            (item.job)(guard);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Queue state stays consistent across a payload panic; keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for AdmissionQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("AdmissionQueue")
            .field("capacity", &self.capacity)
            .field("active", &inner.active)
            .field("depth", &inner.pending.len())
            .field("max_pending", &self.max_pending)
            .finish()
    }
}
