//! First-write interception: [`EndSignal`].

use crate::queue::SlotGuard;

use super::Respond;

/// Decorator that settles a work item's completion on the first terminating
/// write.
///
/// Owns the inner response and the item's [`SlotGuard`]. The first call to
/// [`end`](Respond::end) takes the guard, settles the completion, then
/// forwards the write unchanged; later calls forward only. If the handler
/// drops the wrapper without ever writing, the guard settles on drop — the
/// slot cannot leak.
///
/// Wrapping is idempotent: [`EndSignal::wrap`] refuses to arm a second
/// signal over a response that already carries one
/// ([`Respond::instrumented`]), so stacked middleware cannot double-fire.
pub struct EndSignal<R> {
    inner: R,
    armed: Option<SlotGuard>,
}

impl<R: Respond> EndSignal<R> {
    /// Wraps a response so its first terminating write settles `guard`.
    ///
    /// If `inner` is already instrumented, no second signal is armed and the
    /// redundant guard settles immediately — its slot is freed rather than
    /// held until a write that the inner signal will claim.
    pub fn wrap(inner: R, guard: SlotGuard) -> Self {
        let armed = if inner.instrumented() {
            drop(guard);
            None
        } else {
            Some(guard)
        };
        Self { inner, armed }
    }

    /// Shared access to the wrapped response.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable access to the wrapped response.
    ///
    /// Writes made this way bypass the interception; only
    /// [`end`](Respond::end) on the wrapper settles the completion.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwraps the inner response.
    ///
    /// If the signal is still armed it settles now, exactly as if the
    /// wrapper had been dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Respond> Respond for EndSignal<R> {
    fn end(&mut self, body: &[u8]) {
        // First write fires the signal; the interception then steps aside.
        if let Some(guard) = self.armed.take() {
            guard.finish();
        }
        self.inner.end(body);
    }

    fn instrumented(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::config::QueueConfig;
    use crate::queue::{AdmissionQueue, SlotGuard};

    struct Buffer {
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl Respond for Buffer {
        fn end(&mut self, body: &[u8]) {
            self.writes.lock().unwrap().push(body.to_vec());
        }
    }

    fn running_guard(q: &Arc<AdmissionQueue>) -> SlotGuard {
        let held = Arc::new(Mutex::new(Vec::new()));
        let slot = Arc::clone(&held);
        q.submit(Box::new(move |g| slot.lock().unwrap().push(g)))
            .unwrap();
        let guard = held.lock().unwrap().pop().expect("job ran inline");
        guard
    }

    #[test]
    fn test_first_end_settles_and_forwards() {
        let q = AdmissionQueue::new(QueueConfig::with_capacity(1)).unwrap();
        let writes = Arc::new(Mutex::new(Vec::new()));
        let mut res = EndSignal::wrap(
            Buffer {
                writes: Arc::clone(&writes),
            },
            running_guard(&q),
        );
        assert_eq!(q.active(), 1);

        res.end(b"payload");
        assert_eq!(q.active(), 0, "first end frees the slot");
        assert_eq!(writes.lock().unwrap().as_slice(), &[b"payload".to_vec()]);
    }

    #[test]
    fn test_double_end_fires_once() {
        let q = AdmissionQueue::new(QueueConfig::with_capacity(1)).unwrap();
        let writes = Arc::new(Mutex::new(Vec::new()));
        let mut res = EndSignal::wrap(
            Buffer {
                writes: Arc::clone(&writes),
            },
            running_guard(&q),
        );

        res.end(b"one");
        res.end(b"two");

        // Both writes forwarded; the slot released exactly once.
        assert_eq!(writes.lock().unwrap().len(), 2);
        assert_eq!(q.active(), 0);
    }

    #[test]
    fn test_drop_without_end_settles() {
        let q = AdmissionQueue::new(QueueConfig::with_capacity(1)).unwrap();
        let writes = Arc::new(Mutex::new(Vec::new()));
        let res = EndSignal::wrap(Buffer { writes }, running_guard(&q));
        assert_eq!(q.active(), 1);

        drop(res);
        assert_eq!(q.active(), 0, "dropped wrapper must free the slot");
    }

    #[test]
    fn test_rewrap_does_not_arm_second_signal() {
        let q = AdmissionQueue::new(QueueConfig::with_capacity(2)).unwrap();
        let writes = Arc::new(Mutex::new(Vec::new()));

        let inner = EndSignal::wrap(
            Buffer {
                writes: Arc::clone(&writes),
            },
            running_guard(&q),
        );
        assert_eq!(q.active(), 1);

        // Second wrap: disarmed, its guard settles right away.
        let mut outer = EndSignal::wrap(inner, running_guard(&q));
        assert_eq!(q.active(), 1, "redundant guard settles at wrap time");

        outer.end(b"done");
        assert_eq!(q.active(), 0);
        assert_eq!(writes.lock().unwrap().len(), 1);
    }
}
