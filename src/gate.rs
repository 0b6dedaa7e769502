//! The middleware adapter: requests in, work items out.
//!
//! [`Gate`] is the glue between a hosting framework and the
//! [`AdmissionQueue`]. Per request it:
//! 1. wraps the response in an [`EndSignal`], tying slot release to the
//!    terminating write;
//! 2. submits a job that spawns the downstream handler with the wrapped
//!    response;
//! 3. spawns a disconnect watcher that cancels the item if the client leaves
//!    before the item starts running.
//!
//! ```text
//! request ──► Gate::admit ──► AdmissionQueue ──► spawn(handler(EndSignal))
//!                │                  ▲                      │
//!                └── watcher ── cancel (queued only)       ▼
//!                     (client disconnect)           res.end() ──► slot freed
//! ```
//!
//! The hosting application introspects through [`Gate::queue`]: depth, active
//! count and capacity are readable; the only mutations reachable from outside
//! are the documented `submit` and `cancel`.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::QueueConfig;
use crate::error::{ConfigError, SubmitError};
use crate::queue::{AdmissionQueue, SlotGuard, Ticket};
use crate::respond::{EndSignal, Respond};

/// Admission middleware over one shared [`AdmissionQueue`].
///
/// Cheap to clone; all clones feed the same queue. One `Gate` per
/// application (or per route group that should share a concurrency budget).
///
/// # Example
/// ```
/// use floodgate::{Gate, QueueConfig, Respond};
/// use tokio_util::sync::CancellationToken;
///
/// struct Body(Vec<u8>);
/// impl Respond for Body {
///     fn end(&mut self, body: &[u8]) {
///         self.0.extend_from_slice(body);
///     }
/// }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let gate = Gate::new(QueueConfig::with_capacity(1))?;
///
///     let ticket = gate.admit(
///         Body(Vec::new()),
///         CancellationToken::new(),
///         |mut res| async move { res.end(b"hello") },
///     )?;
///
///     assert!(ticket.wait().await.is_finished());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Gate {
    queue: Arc<AdmissionQueue>,
}

impl Gate {
    /// Creates a gate with a fresh queue.
    ///
    /// Fails with [`ConfigError::ZeroCapacity`] on a zero `capacity`.
    pub fn new(config: QueueConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            queue: AdmissionQueue::new(config)?,
        })
    }

    /// Creates a gate over an existing queue.
    ///
    /// Lets several adapters share one concurrency budget.
    pub fn from_queue(queue: Arc<AdmissionQueue>) -> Self {
        Self { queue }
    }

    /// The underlying queue, for introspection (`depth`, `active`,
    /// `capacity`) and its lifecycle [`events`](AdmissionQueue::events).
    pub fn queue(&self) -> &Arc<AdmissionQueue> {
        &self.queue
    }

    /// Admits one request.
    ///
    /// The handler runs when a slot frees up, in its own spawned task,
    /// receiving the response wrapped in an [`EndSignal`]; the slot is held
    /// until the terminating write (or until the handler bails out and the
    /// wrapper drops). `disconnect` is the client-gone notification: if it
    /// trips while the item still waits, the item is cancelled and the
    /// handler never runs. Tripping it after the item started has no effect.
    ///
    /// The handler's output is not interpreted: a fallible handler reports
    /// errors through whatever channel the host gives it, and an early error
    /// return still settles the item (the wrapper drops). The queue only
    /// does slot accounting.
    ///
    /// Returns the item's [`Ticket`]; fails fast with [`SubmitError::Full`]
    /// at the configured pending ceiling.
    ///
    /// Must be called within a tokio runtime.
    pub fn admit<R, H, Fut>(
        &self,
        response: R,
        disconnect: CancellationToken,
        handler: H,
    ) -> Result<Ticket, SubmitError>
    where
        R: Respond + 'static,
        H: FnOnce(EndSignal<R>) -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        let job = Box::new(move |guard: SlotGuard| {
            let res = EndSignal::wrap(response, guard);
            tokio::spawn(handler(res));
        });
        let ticket = self.queue.submit(job)?;

        // Watch the connection only while the item can still be abandoned;
        // the settled token ends the watch as soon as the outcome is fixed.
        let queue = Arc::clone(&self.queue);
        let id = ticket.id();
        let settled = ticket.settled();
        tokio::spawn(async move {
            tokio::select! {
                _ = disconnect.cancelled() => {
                    queue.cancel(id);
                }
                _ = settled.cancelled() => {}
            }
        });

        Ok(ticket)
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate").field("queue", &self.queue).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use crate::queue::Outcome;

    struct Body {
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl Body {
        fn new() -> (Self, Arc<Mutex<Vec<Vec<u8>>>>) {
            let writes = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    writes: Arc::clone(&writes),
                },
                writes,
            )
        }
    }

    impl Respond for Body {
        fn end(&mut self, body: &[u8]) {
            self.writes.lock().unwrap().push(body.to_vec());
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_admitted_handler_writes_and_finishes() {
        let gate = Gate::new(QueueConfig::with_capacity(1)).unwrap();
        let (body, writes) = Body::new();

        let ticket = gate
            .admit(body, CancellationToken::new(), |mut res| async move {
                res.end(b"hello");
            })
            .unwrap();

        assert_eq!(ticket.wait().await, Outcome::Finished);
        assert_eq!(writes.lock().unwrap().as_slice(), &[b"hello".to_vec()]);
        assert_eq!(gate.queue().active(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_serialized_requests_run_in_order() {
        let gate = Gate::new(QueueConfig::with_capacity(1)).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut tickets = Vec::new();
        for tag in [b"a", b"b", b"c"] {
            let (body, _) = Body::new();
            let order = Arc::clone(&order);
            tickets.push(
                gate.admit(body, CancellationToken::new(), move |mut res| async move {
                    order.lock().unwrap().push(tag.to_vec());
                    res.end(tag);
                })
                .unwrap(),
            );
        }

        for ticket in tickets {
            assert_eq!(ticket.wait().await, Outcome::Finished);
        }
        let seen: Vec<Vec<u8>> = order.lock().unwrap().clone();
        assert_eq!(seen, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_disconnect_while_queued_cancels() {
        // capacity 2: A and B run, C waits; C's client leaves.
        let gate = Gate::new(QueueConfig::with_capacity(2)).unwrap();
        let release = Arc::new(Notify::new());
        let c_ran = Arc::new(AtomicBool::new(false));

        let mut running = Vec::new();
        for _ in 0..2 {
            let (body, _) = Body::new();
            let release = Arc::clone(&release);
            running.push(
                gate.admit(body, CancellationToken::new(), move |mut res| async move {
                    release.notified().await;
                    res.end(b"done");
                })
                .unwrap(),
            );
        }

        let (body, _) = Body::new();
        let c_disconnect = CancellationToken::new();
        let ran = Arc::clone(&c_ran);
        let c = gate
            .admit(body, c_disconnect.clone(), move |mut res| async move {
                ran.store(true, Ordering::SeqCst);
                res.end(b"c");
            })
            .unwrap();
        assert_eq!(gate.queue().depth(), 1);

        c_disconnect.cancel();
        assert_eq!(c.wait().await, Outcome::Cancelled);
        assert!(!c_ran.load(Ordering::SeqCst), "cancelled item must not run");
        assert_eq!(gate.queue().active(), 2, "A and B unaffected");

        // Let A and B reach their notified() await points before waking them.
        tokio::task::yield_now().await;
        release.notify_waiters();
        for ticket in running {
            assert_eq!(ticket.wait().await, Outcome::Finished);
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_disconnect_while_running_is_noop() {
        let gate = Gate::new(QueueConfig::with_capacity(1)).unwrap();
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let disconnect = CancellationToken::new();

        let (body, writes) = Body::new();
        let started_tx = Arc::clone(&started);
        let release_rx = Arc::clone(&release);
        let ticket = gate
            .admit(body, disconnect.clone(), move |mut res| async move {
                started_tx.notify_one();
                release_rx.notified().await;
                res.end(b"survived");
            })
            .unwrap();

        started.notified().await;
        disconnect.cancel();
        tokio::task::yield_now().await;
        assert_eq!(gate.queue().active(), 1, "running item keeps its slot");

        release.notify_one();
        assert_eq!(ticket.wait().await, Outcome::Finished);
        assert_eq!(writes.lock().unwrap().as_slice(), &[b"survived".to_vec()]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_handler_without_end_still_frees_slot() {
        let gate = Gate::new(QueueConfig::with_capacity(1)).unwrap();

        let (body, _) = Body::new();
        let silent = gate
            .admit(body, CancellationToken::new(), |_res| async move {
                // Returns without a terminating write; the wrapper drop settles.
            })
            .unwrap();
        assert_eq!(silent.wait().await, Outcome::Finished);

        let (body, writes) = Body::new();
        let next = gate
            .admit(body, CancellationToken::new(), |mut res| async move {
                res.end(b"next");
            })
            .unwrap();
        assert_eq!(next.wait().await, Outcome::Finished);
        assert_eq!(writes.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_failing_handler_settles_and_unblocks() {
        let gate = Gate::new(QueueConfig::with_capacity(1)).unwrap();

        let (body, _) = Body::new();
        let failing = gate
            .admit(body, CancellationToken::new(), |_res| async move {
                // Error return before the terminating write; the wrapper
                // drop still settles the item.
                Err::<(), &str>("boom")
            })
            .unwrap();
        assert_eq!(failing.wait().await, Outcome::Finished);

        let (body, writes) = Body::new();
        let next = gate
            .admit(body, CancellationToken::new(), |mut res| async move {
                res.end(b"after failure");
            })
            .unwrap();
        assert_eq!(next.wait().await, Outcome::Finished);
        assert_eq!(writes.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_pending_ceiling_applies_through_gate() {
        let gate = Gate::new(QueueConfig {
            capacity: 1,
            max_pending: Some(1),
            ..QueueConfig::default()
        })
        .unwrap();
        let release = Arc::new(Notify::new());

        let (body, _) = Body::new();
        let hold = Arc::clone(&release);
        let _running = gate
            .admit(body, CancellationToken::new(), move |mut res| async move {
                hold.notified().await;
                res.end(b"x");
            })
            .unwrap();
        let (body, _) = Body::new();
        let _queued = gate
            .admit(body, CancellationToken::new(), |mut res| async move {
                res.end(b"y");
            })
            .unwrap();

        let (body, _) = Body::new();
        let err = gate
            .admit(body, CancellationToken::new(), |mut res| async move {
                res.end(b"z");
            })
            .err();
        assert_eq!(err, Some(SubmitError::Full { limit: 1 }));
        release.notify_one();
    }
}
