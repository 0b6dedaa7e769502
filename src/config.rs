//! Queue configuration.
//!
//! [`QueueConfig`] carries the only tunables the admission core needs:
//! the concurrency [`capacity`](QueueConfig::capacity), an optional
//! [`max_pending`](QueueConfig::max_pending) ceiling on the backlog, and the
//! event bus ring size. Validation happens once, at queue construction;
//! a zero capacity is rejected with [`ConfigError::ZeroCapacity`].

use crate::error::ConfigError;

/// Default concurrency capacity: one slot, fully serializing handlers.
///
/// Chosen deliberately conservative — an admission gate that silently ran
/// everything in parallel by default would not gate anything.
pub const DEFAULT_CAPACITY: usize = 1;

/// Default event bus ring capacity.
pub const DEFAULT_BUS_CAPACITY: usize = 64;

/// Configuration for an [`AdmissionQueue`](crate::AdmissionQueue).
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Maximum number of concurrently running items (execution slots).
    ///
    /// Must be positive. `1` fully serializes handlers.
    pub capacity: usize,

    /// Optional ceiling on the pending (queued, not yet running) backlog.
    ///
    /// When the ceiling is reached, `submit()` fails fast with
    /// [`SubmitError::Full`](crate::SubmitError::Full) instead of letting the
    /// backlog grow without bound. `None` disables the ceiling.
    pub max_pending: Option<usize>,

    /// Capacity of the event broadcast channel.
    ///
    /// Slow event receivers lag and skip; they never block the queue.
    pub bus_capacity: usize,
}

impl Default for QueueConfig {
    /// Returns a configuration with:
    /// - `capacity = 1` (serialized);
    /// - no pending ceiling;
    /// - `bus_capacity = 64`.
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_pending: None,
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

impl QueueConfig {
    /// Creates a configuration with the given capacity and defaults elsewhere.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Checks the configuration for invalid values.
    ///
    /// Called by [`AdmissionQueue::new`](crate::AdmissionQueue::new); exposed
    /// so hosts can validate user-supplied settings early.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}
