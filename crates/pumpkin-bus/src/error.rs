//! Error types for the event bus.

use crate::channel::SlotHandle;
use thiserror::Error;

/// Errors from bus operations.
///
/// Most bus operations are deliberately infallible: publishing to an unknown
/// event and removing unknown subscribers are silent no-ops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Subscriptions need a non-empty event name.
    #[error("Event name must not be empty")]
    EmptyEventName,

    /// A subscriber panicked and the bus is configured to abort delivery.
    #[error("Subscriber {handle} on event '{event}' panicked: {message}")]
    SubscriberPanicked {
        event: String,
        handle: SlotHandle,
        message: String,
    },

    /// A failure policy string could not be parsed.
    #[error("Unknown failure policy '{0}' (expected 'isolate' or 'abort')")]
    InvalidFailurePolicy(String),
}
