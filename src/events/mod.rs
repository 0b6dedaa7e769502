//! Queue lifecycle events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by the admission queue.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publisher**: [`AdmissionQueue`](crate::AdmissionQueue) (submit, dispatch,
//!   cancel, release paths).
//! - **Consumers**: anything holding a receiver from [`Bus::subscribe`];
//!   see [`subscribers::attach`](crate::subscribers::attach) for the
//!   worker-loop helper.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
