//! # Pumpkin Bus - Signals/Slots for Decoupled Modules
//!
//! Lets independent parts of an application talk through named events
//! without holding references to each other.
//!
//! ## Model
//!
//! ```text
//! ┌────────────┐  publish("saved")   ┌─────────────────────────────┐
//! │ Module A   │ ──────────────────► │ NamespaceRegistry           │
//! │ bus("ns")  │                     │   "ns" ─► Vine              │
//! └────────────┘                     │     "saved" ─► EventChannel │
//! ┌────────────┐  subscribe("saved") │                             │
//! │ Module B   │ ──────────────────► │                             │
//! │ bus("ns")  │                     └─────────────────────────────┘
//! └────────────┘
//! ```
//!
//! Two buses built with the same namespace name resolve the same [`Vine`],
//! so a subscription made through one is visible to a publish made through
//! the other. Different namespace names are fully isolated.
//!
//! ## Delivery
//!
//! - Synchronous, on the publishing thread, in ascending handle order.
//! - The subscriber list is snapshotted before delivery; callbacks may
//!   subscribe, unsubscribe or publish without affecting the in-flight call.
//! - A panicking subscriber is isolated by default ([`FailurePolicy`]).
//!
//! ## Example
//!
//! ```
//! use pumpkin_bus::EventBus;
//! use serde_json::json;
//!
//! let bus = EventBus::with_namespace("doc-example");
//! let handle = bus.subscribe("greet", |payload| {
//!     assert_eq!(payload["name"], "pumpkin");
//! });
//! assert!(handle.is_some());
//!
//! let report = bus.publish("greet", json!({ "name": "pumpkin" })).unwrap();
//! assert_eq!(report.delivered, 1);
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod channel;
pub mod config;
pub mod error;
pub mod registry;

// Re-export main types
pub use bus::{EventBus, PublishReport};
pub use channel::{EventChannel, Payload, SlotHandle, Subscriber};
pub use config::{BusConfig, FailurePolicy};
pub use error::BusError;
pub use registry::{NamespaceRegistry, Vine};

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "PumpkinPatch";

/// The payload sent by [`EventBus::publish_empty`]: an empty JSON object.
#[must_use]
pub fn empty_payload() -> Payload {
    Payload::Object(serde_json::Map::new())
}
