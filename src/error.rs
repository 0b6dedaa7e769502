//! Error types used by the floodgate queue and middleware adapter.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`] — invalid configuration, rejected before any work is accepted.
//! - [`SubmitError`] — a submission the queue refused to take.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! Two conditions from the queue's contract are deliberately **not** errors:
//! - Cancelling an item that already started (or already settled) is a silent
//!   no-op; [`AdmissionQueue::cancel`](crate::AdmissionQueue::cancel) reports it
//!   by returning `false`.
//! - Settling a completion twice is prevented by construction (the one-shot
//!   sender is moved out of an `Option` on first settlement) and can never be
//!   observed by callers.

use thiserror::Error;

/// # Errors raised when building a queue or gate.
///
/// Configuration is validated at construction, before any request is accepted;
/// these errors are fatal for whoever wires the middleware up.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `capacity` was zero; the queue needs at least one execution slot.
    #[error("capacity must be a positive integer")]
    ZeroCapacity,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use floodgate::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroCapacity.as_label(), "config_zero_capacity");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroCapacity => "config_zero_capacity",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::ZeroCapacity => "capacity must be a positive integer".to_string(),
        }
    }
}

/// # Errors returned by [`AdmissionQueue::submit`](crate::AdmissionQueue::submit).
///
/// Submission only fails when a pending ceiling is configured and the backlog
/// already sits at that ceiling; the queue fails fast instead of growing
/// without bound.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The pending queue reached its configured ceiling.
    #[error("pending queue full (limit {limit})")]
    Full {
        /// The configured `max_pending` ceiling.
        limit: usize,
    },
}

impl SubmitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use floodgate::SubmitError;
    ///
    /// let err = SubmitError::Full { limit: 64 };
    /// assert_eq!(err.as_label(), "submit_full");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubmitError::Full { .. } => "submit_full",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubmitError::Full { limit } => format!("pending queue full; limit={limit}"),
        }
    }
}
