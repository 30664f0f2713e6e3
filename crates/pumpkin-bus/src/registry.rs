//! # Namespace Registry
//!
//! Maps namespace names to their [`Vine`] (the per-namespace event table).
//!
//! ```text
//! NamespaceRegistry
//! ├── "PumpkinPatch" ─► Vine { "saved" ─► EventChannel, "closed" ─► EventChannel }
//! └── "admin"        ─► Vine { "login" ─► EventChannel }
//! ```
//!
//! A process-wide registry is available through [`NamespaceRegistry::global`].
//! Embedders and tests that want isolation construct their own and inject it
//! with [`EventBus::with_registry`](crate::EventBus::with_registry).

use crate::channel::{EventChannel, SlotHandle, Subscriber};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<NamespaceRegistry> = Arc::new(NamespaceRegistry::new());
}

/// Event table of one namespace, shared by every bus bound to it.
#[derive(Debug)]
pub struct Vine {
    name: String,

    /// Event name -> channel.
    events: RwLock<HashMap<String, Arc<EventChannel>>>,

    /// Publishes made through any bus of this namespace.
    events_published: AtomicU64,
}

impl Vine {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: RwLock::new(HashMap::new()),
            events_published: AtomicU64::new(0),
        }
    }

    /// The namespace name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a channel without creating it.
    #[must_use]
    pub fn get(&self, event_name: &str) -> Option<Arc<EventChannel>> {
        self.events.read().get(event_name).cloned()
    }

    /// Look up a channel, creating an empty one if absent.
    pub fn get_or_create(&self, event_name: &str) -> Arc<EventChannel> {
        if let Some(channel) = self.get(event_name) {
            return channel;
        }

        let mut events = self.events.write();
        Arc::clone(events.entry(event_name.to_string()).or_insert_with(|| {
            debug!(namespace = %self.name, event = event_name, "Event channel created");
            Arc::new(EventChannel::new())
        }))
    }

    /// Add a subscriber while holding the table lock, so a concurrent
    /// [`remove`](Self::remove) cannot orphan it in a detached channel.
    pub(crate) fn add_subscriber(&self, event_name: &str, subscriber: Subscriber) -> SlotHandle {
        let mut events = self.events.write();
        let channel = events.entry(event_name.to_string()).or_insert_with(|| {
            debug!(namespace = %self.name, event = event_name, "Event channel created");
            Arc::new(EventChannel::new())
        });
        channel.add(subscriber)
    }

    /// Drop a channel and all of its subscribers.
    pub fn remove(&self, event_name: &str) -> Option<Arc<EventChannel>> {
        self.events.write().remove(event_name)
    }

    /// Names of all events with a channel, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of event channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Total publishes made through this namespace.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    pub(crate) fn record_publish(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }
}

/// Namespace name -> [`Vine`].
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    vines: RwLock<HashMap<String, Arc<Vine>>>,
}

impl NamespaceRegistry {
    /// Create an empty, private registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`EventBus::new`](crate::EventBus::new)
    /// and [`EventBus::with_namespace`](crate::EventBus::with_namespace).
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Resolve the vine for `namespace`, creating it on first use.
    pub fn vine(&self, namespace: &str) -> Arc<Vine> {
        if let Some(vine) = self.get(namespace) {
            return vine;
        }

        let mut vines = self.vines.write();
        Arc::clone(vines.entry(namespace.to_string()).or_insert_with(|| {
            debug!(namespace, "Namespace created");
            Arc::new(Vine::new(namespace))
        }))
    }

    /// Look up a vine without creating it.
    #[must_use]
    pub fn get(&self, namespace: &str) -> Option<Arc<Vine>> {
        self.vines.read().get(namespace).cloned()
    }

    /// Names of all namespaces, sorted.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vines.read().keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vines.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vines.read().is_empty()
    }
}
