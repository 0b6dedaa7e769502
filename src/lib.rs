//! # floodgate
//!
//! **Floodgate** is an admission-control queue for request handlers.
//!
//! It bounds how many handlers run concurrently, holds the overflow in FIFO
//! order, and starts queued work as slots free up. Completion is tied to the
//! response being **fully sent** — the terminating write — not to the handler
//! function returning, which matters when handlers stream asynchronously.
//! A queued request whose client disconnects is removed before it ever runs;
//! a request that already started always runs to completion.
//!
//! The crate is framework-agnostic: the hosting web stack supplies a
//! response-like object ([`Respond`]) and a client-disconnect token, nothing
//! more.
//!
//! ## Architecture
//! ```text
//!                 requests (any connection tasks)
//!                        │
//!                        ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Gate (middleware adapter)                                │
//! │  - wraps the response in an EndSignal                     │
//! │  - submits a job to the AdmissionQueue                    │
//! │  - watches the disconnect token while the item waits      │
//! └───────────┬───────────────────────────────────────────────┘
//!             ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  AdmissionQueue                                           │
//! │  - pending: FIFO backlog of queued items                  │
//! │  - active ≤ capacity running items                        │
//! │  - dispatch: promote head of backlog when a slot frees    │
//! │  - Bus: lifecycle events (enqueued/started/finished/...)  │
//! └───────────┬───────────────────────────────────────────────┘
//!             ▼
//!      job(SlotGuard) ──► spawned handler(EndSignal<R>)
//!                                  │
//!                    res.end(..) ──┴── or wrapper drop
//!                                  │
//!                        completion settles, slot freed,
//!                        next queued item dispatched
//! ```
//!
//! ### Request lifecycle
//! ```text
//! Queued --(slot available)----> Running --(response fully sent)--> Finished
//! Queued --(client disconnects)-> Cancelled
//! ```
//! There is no `Running -> Cancelled` transition: a started handler has
//! already committed side effects downstream and is never abandoned.
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits          |
//! |-------------------|---------------------------------------------------------------|-----------------------------|
//! | **Admission**     | Bounded concurrency with FIFO overflow and fail-fast ceiling. | [`AdmissionQueue`], [`Ticket`] |
//! | **Completion**    | Slot release tied to the terminating write, or guaranteed on drop. | [`EndSignal`], [`SlotGuard`] |
//! | **Middleware**    | Per-request wiring: wrap, submit, watch disconnect.           | [`Gate`], [`Respond`]       |
//! | **Observability** | Broadcast lifecycle events, pluggable subscribers.            | [`Bus`], [`Event`], [`Subscribe`] |
//! | **Errors**        | Typed errors for configuration and refused submissions.       | [`ConfigError`], [`SubmitError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use floodgate::{Gate, QueueConfig, Respond};
//! use tokio_util::sync::CancellationToken;
//!
//! struct Body(Vec<u8>);
//!
//! impl Respond for Body {
//!     fn end(&mut self, body: &[u8]) {
//!         self.0.extend_from_slice(body);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // capacity 1: handlers run strictly one at a time.
//!     let gate = Gate::new(QueueConfig::with_capacity(1))?;
//!
//!     // Per request: the response, a disconnect token from the connection,
//!     // and the downstream handler.
//!     let disconnect = CancellationToken::new();
//!     let ticket = gate.admit(Body(Vec::new()), disconnect, |mut res| async move {
//!         res.end(b"hello");
//!     })?;
//!
//!     assert!(ticket.wait().await.is_finished());
//!     assert_eq!(gate.queue().active(), 0);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod events;
mod gate;
mod queue;
mod respond;

pub mod subscribers;

// ---- Public re-exports ----

pub use config::{QueueConfig, DEFAULT_BUS_CAPACITY, DEFAULT_CAPACITY};
pub use error::{ConfigError, SubmitError};
pub use events::{Bus, Event, EventKind};
pub use gate::Gate;
pub use queue::{AdmissionQueue, ItemId, Job, Outcome, SlotGuard, Ticket};
pub use respond::{EndSignal, Respond};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
