//! # Event Channel
//!
//! Ordered, handle-addressable storage of subscribers for a single event.
//!
//! Slots are never shifted or reused: removing a subscriber empties its slot,
//! so a handle keeps pointing at the same record (or at nothing) for as long
//! as the channel lives.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Data passed to every subscriber of a publish.
pub type Payload = serde_json::Value;

type SlotFn = dyn Fn(&Payload) + Send + Sync;

/// Position of a subscriber inside its [`EventChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotHandle(usize);

impl SlotHandle {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SlotHandle> for usize {
    fn from(handle: SlotHandle) -> Self {
        handle.0
    }
}

/// A stored callback with its receiver context already bound.
pub struct Subscriber {
    callback: Box<SlotFn>,
}

impl Subscriber {
    /// Wrap a plain callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Bind `scope` as the receiver the callback observes on every call.
    pub fn scoped<S, F>(scope: Arc<S>, callback: F) -> Self
    where
        S: Send + Sync + ?Sized + 'static,
        F: Fn(&S, &Payload) + Send + Sync + 'static,
    {
        Self::new(move |payload| callback(&*scope, payload))
    }

    /// Invoke the callback.
    pub fn call(&self, payload: &Payload) {
        (self.callback)(payload);
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").finish_non_exhaustive()
    }
}

/// Subscribers of one named event.
#[derive(Debug, Default)]
pub struct EventChannel {
    /// Sparse slots; `None` marks a removed subscriber.
    slots: RwLock<Vec<Option<Arc<Subscriber>>>>,
}

impl EventChannel {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber and return its handle.
    ///
    /// Identical callbacks may be added repeatedly; each gets its own handle.
    pub fn add(&self, subscriber: Subscriber) -> SlotHandle {
        let mut slots = self.slots.write();
        slots.push(Some(Arc::new(subscriber)));
        SlotHandle(slots.len() - 1)
    }

    /// Empty the slot at `handle`.
    ///
    /// Returns `false` if the handle is out of range or already empty.
    pub fn remove(&self, handle: SlotHandle) -> bool {
        let mut slots = self.slots.write();
        slots
            .get_mut(handle.0)
            .and_then(Option::take)
            .is_some()
    }

    /// Live subscribers in ascending handle order.
    ///
    /// The returned list is detached from the channel, so later adds and
    /// removes do not affect it.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(SlotHandle, Arc<Subscriber>)> {
        self.slots
            .read()
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref()
                    .map(|subscriber| (SlotHandle(index), Arc::clone(subscriber)))
            })
            .collect()
    }

    /// Whether `handle` refers to a live subscriber.
    #[must_use]
    pub fn contains(&self, handle: SlotHandle) -> bool {
        matches!(self.slots.read().get(handle.0), Some(Some(_)))
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The handle the next [`add`](Self::add) will return.
    #[must_use]
    pub fn next_handle(&self) -> SlotHandle {
        SlotHandle(self.slots.read().len())
    }
}
