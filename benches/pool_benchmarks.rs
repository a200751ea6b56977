//! Worker pool benchmarks
//!
//! Measures submission throughput for both pool variants:
//! - `StealingPool::execute` (unordered, no ownership tracking)
//! - `ManagedPool::submit_for_owner` (owner-keyed)
//! - `ManagedPool::cancel_for_owner` (bulk cancellation of queued work)

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use flowrt::pool::{ManagedPool, OwnerPool, StealingPool, WorkerPool};

fn stealing_pool_submit_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    // StealingPool::new spawns its workers via tokio::spawn, so it must be
    // built from inside a runtime context.
    let pool = rt.block_on(async { StealingPool::new(4) });
    let counter = Arc::new(AtomicU64::new(0));

    c.bench_function("stealing_pool_submit_throughput", |b| {
        b.to_async(&rt).iter(|| {
            let counter = Arc::clone(&counter);
            async move {
                for _ in 0..100 {
                    let counter = Arc::clone(&counter);
                    pool.execute(Box::new(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                    }))
                    .unwrap();
                }
                black_box(counter.load(Ordering::Relaxed))
            }
        });
    });
}

fn managed_pool_submit_for_owner_throughput(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let pool = rt.block_on(async { ManagedPool::new(4) });
    let counter = Arc::new(AtomicU64::new(0));

    c.bench_function("managed_pool_submit_for_owner_throughput", |b| {
        b.to_async(&rt).iter(|| {
            let counter = Arc::clone(&counter);
            async move {
                for _ in 0..100 {
                    let counter = Arc::clone(&counter);
                    pool.submit_for_owner(
                        "bench-owner",
                        Box::new(move || {
                            counter.fetch_add(1, Ordering::Relaxed);
                        }),
                    )
                    .unwrap();
                }
                black_box(counter.load(Ordering::Relaxed))
            }
        });
    });
}

fn managed_pool_cancel_for_owner(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    // A single, slow-starting worker so tasks pile up faster than they
    // drain, leaving a realistic backlog for cancel_for_owner to clear.
    let pool = rt.block_on(async { ManagedPool::new(1) });

    c.bench_function("managed_pool_cancel_for_owner", |b| {
        b.iter(|| {
            for _ in 0..100 {
                let _ = pool.submit_for_owner("bulk-owner", Box::new(|| std::thread::sleep(Duration::from_millis(1))));
            }
            black_box(pool.cancel_for_owner("bulk-owner"))
        });
    });
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        stealing_pool_submit_throughput,
        managed_pool_submit_for_owner_throughput,
        managed_pool_cancel_for_owner
}

criterion_main!(benches);
