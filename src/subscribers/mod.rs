//! Event subscribers: the observability extension point.
//!
//! ## Contents
//! - [`Subscribe`] — async trait for consuming queue lifecycle events.
//! - [`attach`] — spawns a worker loop feeding a subscriber from a [`Bus`].
//! - [`LogWriter`] — stdout demo logger (feature `logging`).

mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::events::Bus;

/// Spawns a worker task that delivers bus events to `subscriber`.
///
/// The worker runs until the bus closes (every queue holding the bus has
/// been dropped). Lagged receivers skip missed events and keep going; a
/// subscriber that falls behind loses history, never correctness.
///
/// Must be called within a tokio runtime.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use floodgate::{AdmissionQueue, Event, EventKind, QueueConfig, Subscribe, subscribers};
///
/// struct Depths;
///
/// #[async_trait]
/// impl Subscribe for Depths {
///     async fn on_event(&self, ev: &Event) {
///         if matches!(ev.kind, EventKind::Enqueued) {
///             // export a gauge, etc.
///         }
///     }
///
///     fn name(&self) -> &'static str { "depths" }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let queue = AdmissionQueue::new(QueueConfig::default()).unwrap();
/// let worker = subscribers::attach(queue.events(), Arc::new(Depths));
/// # }
/// ```
pub fn attach(bus: &Bus, subscriber: Arc<dyn Subscribe>) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subscriber.on_event(&ev).await,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::QueueConfig;
    use crate::events::{Event, EventKind};
    use crate::queue::AdmissionQueue;

    struct Recorder {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.kinds.lock().unwrap().push(ev.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_attached_subscriber_sees_lifecycle() {
        let q = AdmissionQueue::new(QueueConfig::with_capacity(1)).unwrap();
        let recorder = Arc::new(Recorder {
            kinds: Mutex::new(Vec::new()),
        });
        let worker = attach(q.events(), Arc::clone(&recorder) as Arc<dyn Subscribe>);

        let ticket = q
            .submit(Box::new(|guard| guard.finish()))
            .unwrap();
        ticket.wait().await;

        // Dropping the queue closes the bus and ends the worker.
        drop(q);
        worker.await.unwrap();

        let kinds = recorder.kinds.lock().unwrap().clone();
        assert_eq!(
            kinds,
            vec![EventKind::Enqueued, EventKind::Started, EventKind::Finished]
        );
    }
}
