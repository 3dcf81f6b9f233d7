//! Fixed-window rate limiter benchmarks
//!
//! Run with: `cargo bench --bench rate_limiter_bench -p woosap-common
//! --features runtime`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use woosap_common::resilience::{
    ClientContext, FixedWindowRateLimiter, InMemoryCounterStore, RateLimitKey, RateLimitPolicy,
};

fn bench_key_derivation(c: &mut Criterion) {
    c.bench_function("rate_limit_key_derive", |b| {
        b.iter(|| RateLimitKey::derive(black_box("sync_product"), black_box("203.0.113.10")));
    });
}

fn bench_enforce(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_window_enforce");

    for clients in [1_usize, 64, 1024] {
        group.bench_with_input(BenchmarkId::new("distinct_clients", clients), &clients, |b, &n| {
            let limiter = FixedWindowRateLimiter::new(Arc::new(InMemoryCounterStore::new()));
            let policy = RateLimitPolicy::per_seconds(u32::MAX, 3600)
                .unwrap_or_else(|e| panic!("benchmark policy invalid: {e}"));
            let contexts: Vec<_> = (0..n)
                .map(|i| ClientContext::from_remote_addr(format!("10.0.{}.{}", i / 256, i % 256)))
                .collect();
            let mut i = 0;
            b.iter(|| {
                let ctx = &contexts[i % contexts.len()];
                i += 1;
                black_box(limiter.check(ctx, "sync_product", &policy).is_ok())
            });
        });
    }

    group.bench_function("denied_path", |b| {
        let limiter = FixedWindowRateLimiter::new(Arc::new(InMemoryCounterStore::new()));
        let client = ClientContext::from_remote_addr("203.0.113.10");
        let _ = limiter.enforce(&client, "sync_product", 1, 3600);
        b.iter(|| black_box(limiter.enforce(&client, "sync_product", 1, 3600).is_err()));
    });

    group.finish();
}

criterion_group!(benches, bench_key_derivation, bench_enforce);
criterion_main!(benches);
