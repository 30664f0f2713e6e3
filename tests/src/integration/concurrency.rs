//! # Multi-threaded Use
//!
//! Delivery stays synchronous on the publishing thread, but the registry and
//! channels may be shared between threads.

#[cfg(test)]
mod tests {
    use super::super::private_bus;
    use pumpkin_bus::{EventBus, NamespaceRegistry};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_subscribe_yields_distinct_handles() {
        let bus = private_bus("threads");
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let bus = bus.clone();
                thread::spawn(move || {
                    (0..50)
                        .filter_map(|_| bus.subscribe("x", |_| {}))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut handles = HashSet::new();
        for worker in workers {
            for handle in worker.join().unwrap() {
                assert!(handles.insert(handle), "handle {handle} issued twice");
            }
        }

        assert_eq!(handles.len(), 400);
        assert_eq!(bus.subscriber_count("x"), 400);
        assert_eq!(bus.get_event("x").unwrap().next_handle().index(), 400);
    }

    #[test]
    fn test_publish_from_many_threads() {
        let registry = Arc::new(NamespaceRegistry::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let subscriber = EventBus::with_registry(Arc::clone(&registry), "fan-in");
        let counter = Arc::clone(&hits);
        subscriber.subscribe("tick", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let publishers: Vec<_> = (0..4)
            .map(|_| {
                let bus = EventBus::with_registry(Arc::clone(&registry), "fan-in");
                thread::spawn(move || {
                    for _ in 0..25 {
                        bus.publish_empty("tick").unwrap();
                    }
                })
            })
            .collect();

        for publisher in publishers {
            publisher.join().unwrap();
        }

        assert_eq!(hits.load(Ordering::SeqCst), 100);
        assert_eq!(subscriber.events_published(), 100);
    }

    #[test]
    fn test_namespace_resolution_is_race_free() {
        let registry = Arc::new(NamespaceRegistry::new());
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let bus = EventBus::with_registry(registry, "contended");
                    bus.subscribe(&format!("event-{i}"), |_| {});
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(registry.len(), 1);
        let bus = EventBus::with_registry(registry, "contended");
        assert_eq!(bus.event_names().len(), 8);
    }

    #[test]
    fn test_subscribe_racing_unsubscribe_all_never_orphans() {
        let registry = Arc::new(NamespaceRegistry::new());
        let vine = registry.vine("churn");
        let done = Arc::new(AtomicBool::new(false));

        let clearers: Vec<_> = (0..2)
            .map(|_| {
                let vine = Arc::clone(&vine);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut removed = Vec::new();
                    while !done.load(Ordering::SeqCst) {
                        if let Some(channel) = vine.remove("x") {
                            let len = channel.len();
                            removed.push((channel, len));
                        }
                        thread::yield_now();
                    }
                    removed
                })
            })
            .collect();

        let subscribers: Vec<_> = (0..4)
            .map(|_| {
                let bus = EventBus::with_registry(Arc::clone(&registry), "churn");
                thread::spawn(move || {
                    for _ in 0..200 {
                        assert!(bus.subscribe("x", |_| {}).is_some());
                    }
                })
            })
            .collect();

        for subscriber in subscribers {
            subscriber.join().unwrap();
        }
        done.store(true, Ordering::SeqCst);

        let mut accounted = 0;
        for clearer in clearers {
            for (channel, len_at_removal) in clearer.join().unwrap() {
                // A detached channel must never receive a late subscriber
                assert_eq!(channel.len(), len_at_removal);
                accounted += len_at_removal;
            }
        }
        accounted += vine.get("x").map_or(0, |channel| channel.len());

        assert_eq!(accounted, 800);
    }
}
