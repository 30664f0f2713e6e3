//! # Pumpkin Bus Benchmarks
//!
//! | Operation | Expectation |
//! |-----------|-------------|
//! | subscribe | amortized O(1) append |
//! | publish   | O(live subscribers) plus one snapshot copy |
//! | publish to unknown event | single map lookup |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pumpkin_bus::{EventBus, NamespaceRegistry};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn private_bus() -> EventBus {
    EventBus::with_registry(Arc::new(NamespaceRegistry::new()), "bench")
}

fn bench_publish_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish-fan-out");

    for subscribers in [1, 10, 100, 1000] {
        let bus = private_bus();
        let sum = Arc::new(AtomicU64::new(0));
        for _ in 0..subscribers {
            let sum = Arc::clone(&sum);
            bus.subscribe("tick", move |payload| {
                sum.fetch_add(payload["n"].as_u64().unwrap_or(0), Ordering::Relaxed);
            });
        }

        let payload = json!({ "n": 1 });
        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, _| b.iter(|| black_box(bus.publish("tick", payload.clone()))),
        );
    }

    group.finish();
}

fn bench_publish_unknown(c: &mut Criterion) {
    let bus = private_bus();
    bus.subscribe("known", |_| {});

    c.bench_function("publish-unknown-event", |b| {
        b.iter(|| black_box(bus.publish_empty("unknown")))
    });
}

fn bench_subscribe(c: &mut Criterion) {
    c.bench_function("subscribe-1000", |b| {
        b.iter(|| {
            let bus = private_bus();
            for _ in 0..1000 {
                black_box(bus.subscribe("x", |_| {}));
            }
        })
    });
}

criterion_group!(
    benches,
    bench_publish_fan_out,
    bench_publish_unknown,
    bench_subscribe
);
criterion_main!(benches);
