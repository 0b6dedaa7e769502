//! The admission queue: bounded concurrency with FIFO overflow.
//!
//! ## Contents
//! - [`AdmissionQueue`] — the scheduling engine: slots, pending backlog,
//!   dispatch loop.
//! - [`Ticket`] — per-submission handle: completion future, `cancel`.
//! - [`SlotGuard`] — held by a running item; settles its completion and frees
//!   the slot, on `finish()` or on drop.
//! - [`Job`], [`ItemId`], [`Outcome`] — the work-item vocabulary.
//!
//! ## Work item state machine
//! ```text
//! Queued --(slot available)----> Running --(settled)--> Finished
//! Queued --(cancel/disconnect)-> Cancelled
//! ```
//! A pending entry *is* the `Queued` state; a live [`SlotGuard`] *is* the
//! `Running` state; the settled one-shot is the terminal state. There is no
//! stored state field to drift out of sync with reality.

mod core;
mod item;

pub use core::AdmissionQueue;
pub use item::{ItemId, Job, Outcome, SlotGuard, Ticket};
