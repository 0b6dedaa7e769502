//! Work-item vocabulary: ids, outcomes, jobs, and the two per-item handles.
//!
//! A submission produces two halves:
//! - the caller keeps a [`Ticket`] — observe completion, cancel while queued;
//! - the queue keeps the job, and mints a [`SlotGuard`] when the item is
//!   promoted to running.
//!
//! The guard is the settlement point. `finish()` settles the completion as
//! [`Outcome::Finished`]; dropping an unfinished guard settles it the same
//! way. A handler that errors out, panics inside its spawned task, or simply
//! never performs its terminating write therefore still frees its slot — the
//! queue cannot be wedged by a misbehaving handler. Settlement is idempotent:
//! the one-shot sender is moved out of an `Option` on first use.

use std::fmt;
use std::sync::Weak;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use super::core::AdmissionQueue;

/// Identifier of a work item, unique within one queue.
///
/// Ids are handed out monotonically by
/// [`AdmissionQueue::submit`](crate::AdmissionQueue::submit) and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u64);

impl ItemId {
    /// Returns the raw numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a work item's completion settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The item ran and its completion was settled (terminating write
    /// observed, or the guard was dropped after the handler bailed out).
    Finished,

    /// The item was removed from the pending queue before it ever ran.
    Cancelled,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Finished`].
    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished)
    }

    /// Returns `true` for [`Outcome::Cancelled`].
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }
}

/// The opaque continuation of a work item.
///
/// Invoked exactly once, when the item is promoted to running. The job
/// receives the item's [`SlotGuard`] and decides where the work actually
/// executes — inline, or moved into a spawned task (what
/// [`Gate::admit`](crate::Gate::admit) does).
pub type Job = Box<dyn FnOnce(SlotGuard) + Send + 'static>;

/// Owns one execution slot while a work item runs.
///
/// Settling happens exactly once, through whichever comes first:
/// - [`SlotGuard::finish`] — the terminating write was observed;
/// - `Drop` — the handler bailed out without writing.
///
/// Either way the completion one-shot fires with [`Outcome::Finished`], the
/// slot is released, and the queue runs its dispatch step.
pub struct SlotGuard {
    queue: Weak<AdmissionQueue>,
    id: ItemId,
    done: Option<oneshot::Sender<Outcome>>,
    settled: CancellationToken,
}

impl SlotGuard {
    pub(crate) fn new(
        queue: Weak<AdmissionQueue>,
        id: ItemId,
        done: oneshot::Sender<Outcome>,
        settled: CancellationToken,
    ) -> Self {
        Self {
            queue,
            id,
            done: Some(done),
            settled,
        }
    }

    /// Returns the id of the item holding this slot.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Settles the item as finished and frees its slot.
    ///
    /// Consumes the guard; the subsequent drop is a no-op.
    pub fn finish(mut self) {
        self.settle();
    }

    fn settle(&mut self) {
        // First settlement wins; the drop after finish() finds None here.
        let Some(done) = self.done.take() else {
            return;
        };
        let _ = done.send(Outcome::Finished);
        self.settled.cancel();
        // A gone queue has no slot to free; nothing left to schedule either.
        if let Some(queue) = self.queue.upgrade() {
            queue.release(self.id);
        }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.settle();
    }
}

impl fmt::Debug for SlotGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotGuard")
            .field("id", &self.id)
            .field("settled", &self.done.is_none())
            .finish()
    }
}

/// Handle returned by [`AdmissionQueue::submit`](crate::AdmissionQueue::submit).
///
/// Carries the item id, the completion future ([`Ticket::wait`]) and a
/// [`Ticket::cancel`] convenience. Dropping the ticket does **not** cancel the
/// item; the work proceeds and its outcome goes unobserved.
pub struct Ticket {
    pub(crate) id: ItemId,
    pub(crate) queue: Weak<AdmissionQueue>,
    pub(crate) done: oneshot::Receiver<Outcome>,
    pub(crate) settled: CancellationToken,
}

impl Ticket {
    /// Returns the id of the submitted item.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Cancels the item if it is still queued.
    ///
    /// Returns `true` if the item was removed before running; `false` if it
    /// already started or settled (a silent no-op, per the queue contract).
    pub fn cancel(&self) -> bool {
        match self.queue.upgrade() {
            Some(queue) => queue.cancel(self.id),
            None => false,
        }
    }

    /// Returns a token that trips once the item settles, whatever the path.
    ///
    /// Used by disconnect watchers to stop observing a connection once the
    /// item no longer needs protection.
    pub fn settled(&self) -> CancellationToken {
        self.settled.clone()
    }

    /// Waits for the item's completion and returns how it settled.
    pub async fn wait(self) -> Outcome {
        // A dropped sender means the queue went away with the item still
        // pending; the item never ran.
        self.done.await.unwrap_or(Outcome::Cancelled)
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticket").field("id", &self.id).finish()
    }
}
