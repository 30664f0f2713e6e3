//! # Event Bus
//!
//! The subscribe/publish façade over a shared [`Vine`].

use crate::channel::{EventChannel, Payload, SlotHandle, Subscriber};
use crate::config::{BusConfig, FailurePolicy};
use crate::error::BusError;
use crate::registry::{NamespaceRegistry, Vine};
use crate::{empty_payload, DEFAULT_NAMESPACE};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Outcome of a single [`EventBus::publish`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers whose callback returned normally.
    pub delivered: usize,

    /// Subscribers whose callback panicked (isolate policy only).
    pub failed: Vec<SlotHandle>,
}

impl PublishReport {
    /// Number of subscribers that were invoked.
    #[must_use]
    pub fn invoked(&self) -> usize {
        self.delivered + self.failed.len()
    }

    /// True when every invoked subscriber returned normally.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Handle onto a namespace's event table.
///
/// Cheap to clone. Every bus bound to the same namespace name in the same
/// [`NamespaceRegistry`] sees the same subscriptions.
#[derive(Debug, Clone)]
pub struct EventBus {
    registry: Arc<NamespaceRegistry>,
    vine: Arc<Vine>,
    failure_policy: FailurePolicy,
}

impl EventBus {
    /// Bus on the default namespace of the global registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }

    /// Bus on `namespace` in the global registry.
    #[must_use]
    pub fn with_namespace(namespace: &str) -> Self {
        Self::with_registry(NamespaceRegistry::global(), namespace)
    }

    /// Bus on `namespace` in an explicit registry.
    #[must_use]
    pub fn with_registry(registry: Arc<NamespaceRegistry>, namespace: &str) -> Self {
        let vine = registry.vine(namespace);
        Self {
            registry,
            vine,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Bus built from configuration, in the global registry.
    #[must_use]
    pub fn from_config(config: &BusConfig) -> Self {
        Self::from_config_in(NamespaceRegistry::global(), config)
    }

    /// Bus built from configuration, in an explicit registry.
    #[must_use]
    pub fn from_config_in(registry: Arc<NamespaceRegistry>, config: &BusConfig) -> Self {
        Self::with_registry(registry, &config.namespace).with_failure_policy(config.failure_policy)
    }

    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        self.vine.name()
    }

    #[must_use]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// The registry this bus resolves namespaces in.
    #[must_use]
    pub fn registry(&self) -> &Arc<NamespaceRegistry> {
        &self.registry
    }

    /// Look up the channel for `event_name`. Never creates one.
    #[must_use]
    pub fn get_event(&self, event_name: &str) -> Option<Arc<EventChannel>> {
        self.vine.get(event_name)
    }

    /// Look up the channel for `event_name`, creating an empty one if absent.
    ///
    /// Names are not validated here; use [`subscribe`](Self::subscribe) for
    /// the checked path.
    pub fn get_or_create_event(&self, event_name: &str) -> Arc<EventChannel> {
        self.vine.get_or_create(event_name)
    }

    /// Register `callback` for `event_name`.
    ///
    /// Returns `None` and registers nothing if `event_name` is empty.
    pub fn subscribe<F>(&self, event_name: &str, callback: F) -> Option<SlotHandle>
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        self.try_subscribe(event_name, callback).ok()
    }

    /// Like [`subscribe`](Self::subscribe), but reports why nothing was registered.
    ///
    /// # Errors
    ///
    /// - `BusError::EmptyEventName` - `event_name` is empty
    pub fn try_subscribe<F>(&self, event_name: &str, callback: F) -> Result<SlotHandle, BusError>
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        self.add_subscriber(event_name, Subscriber::new(callback))
    }

    /// Register `callback` with `scope` bound as its receiver.
    ///
    /// Returns `None` and registers nothing if `event_name` is empty.
    pub fn subscribe_with_scope<S, F>(
        &self,
        event_name: &str,
        scope: Arc<S>,
        callback: F,
    ) -> Option<SlotHandle>
    where
        S: Send + Sync + ?Sized + 'static,
        F: Fn(&S, &Payload) + Send + Sync + 'static,
    {
        self.add_subscriber(event_name, Subscriber::scoped(scope, callback)).ok()
    }

    fn add_subscriber(
        &self,
        event_name: &str,
        subscriber: Subscriber,
    ) -> Result<SlotHandle, BusError> {
        if event_name.is_empty() {
            debug!(namespace = %self.namespace(), "Subscription rejected (empty event name)");
            return Err(BusError::EmptyEventName);
        }

        let handle = self.vine.add_subscriber(event_name, subscriber);
        debug!(
            namespace = %self.namespace(),
            event = event_name,
            handle = %handle,
            "Subscriber added"
        );
        Ok(handle)
    }

    /// Invoke every live subscriber of `event_name` with `payload`.
    ///
    /// Subscribers run synchronously in ascending handle order against a
    /// snapshot taken before the first call. Publishing to an event nobody
    /// subscribed to is a no-op and returns an empty report.
    ///
    /// Panics are caught with [`std::panic::catch_unwind`], which does not
    /// silence the process panic hook: the default hook still prints each
    /// subscriber panic to stderr, next to the `warn!` event logged here.
    /// Install a hook with [`std::panic::set_hook`] to change that.
    ///
    /// # Errors
    ///
    /// - `BusError::SubscriberPanicked` - a subscriber panicked under
    ///   [`FailurePolicy::Abort`]; later subscribers were not invoked
    pub fn publish(&self, event_name: &str, payload: Payload) -> Result<PublishReport, BusError> {
        // Always count the attempt, matching subscribers or not
        self.vine.record_publish();

        let Some(channel) = self.get_event(event_name) else {
            trace!(namespace = %self.namespace(), event = event_name, "Publish to unknown event");
            return Ok(PublishReport::default());
        };

        let mut report = PublishReport::default();
        for (handle, subscriber) in channel.snapshot() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| subscriber.call(&payload)));
            let Err(cause) = outcome else {
                report.delivered += 1;
                continue;
            };

            let message = panic_message(cause.as_ref());
            warn!(
                namespace = %self.namespace(),
                event = event_name,
                handle = %handle,
                error = %message,
                policy = %self.failure_policy,
                "Subscriber panicked"
            );

            match self.failure_policy {
                FailurePolicy::Isolate => report.failed.push(handle),
                FailurePolicy::Abort => {
                    return Err(BusError::SubscriberPanicked {
                        event: event_name.to_string(),
                        handle,
                        message,
                    });
                }
            }
        }

        debug!(
            namespace = %self.namespace(),
            event = event_name,
            delivered = report.delivered,
            failed = report.failed.len(),
            "Event published"
        );
        Ok(report)
    }

    /// Publish with an empty object payload.
    ///
    /// # Errors
    ///
    /// See [`publish`](Self::publish).
    pub fn publish_empty(&self, event_name: &str) -> Result<PublishReport, BusError> {
        self.publish(event_name, empty_payload())
    }

    /// Remove one subscriber. Unknown events and handles are ignored.
    pub fn unsubscribe(&self, event_name: &str, handle: SlotHandle) -> bool {
        let removed = self
            .get_event(event_name)
            .is_some_and(|channel| channel.remove(handle));

        if removed {
            debug!(
                namespace = %self.namespace(),
                event = event_name,
                handle = %handle,
                "Subscriber removed"
            );
        }
        removed
    }

    /// Remove `event_name` with all its subscribers.
    ///
    /// Outstanding handles for the event become permanently invalid; a later
    /// subscribe starts a fresh channel whose handles restart at zero.
    /// This also clears a `""` channel made through
    /// [`get_or_create_event`](Self::get_or_create_event).
    pub fn unsubscribe_all(&self, event_name: &str) -> bool {
        let removed = self.vine.remove(event_name).is_some();
        if removed {
            debug!(namespace = %self.namespace(), event = event_name, "Event cleared");
        }
        removed
    }

    /// Live subscribers of `event_name` (0 if the event does not exist).
    #[must_use]
    pub fn subscriber_count(&self, event_name: &str) -> usize {
        self.get_event(event_name).map_or(0, |channel| channel.len())
    }

    /// Events that currently have a channel in this namespace, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        self.vine.event_names()
    }

    /// Publishes made through any bus of this namespace.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.vine.events_published()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> String {
    if let Some(message) = cause.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
