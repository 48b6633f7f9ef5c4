use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use extensor::{Cache, CallbackError, KeyContext, KeyPolicy, PolicyRegistry};
use extensor_moka::MokaBackend;

/// Registry with `size` distinct patterns, the last one being `user/{id}/profile`.
fn registry(size: usize) -> PolicyRegistry<String> {
    let mut registry = PolicyRegistry::default();
    for i in 0..size.saturating_sub(1) {
        registry
            .register(KeyPolicy::new(format!("tenant{i}/{{kind}}/{{id}}")))
            .unwrap();
    }
    registry
        .register(KeyPolicy::new("user/{id}/profile"))
        .unwrap();
    registry
}

/// Benchmark route resolution against registries of growing size.
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for size in [1, 10, 100] {
        let registry = registry(size);

        group.bench_with_input(BenchmarkId::new("last_match", size), &registry, |b, r| {
            b.iter(|| r.resolve(black_box("user/42/profile")).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("no_match", size), &registry, |b, r| {
            b.iter(|| r.resolve(black_box("order/42")).is_none());
        });
    }

    group.finish();
}

/// Benchmark a read-through hit through the full cache path.
fn bench_get(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut cache = Cache::new(MokaBackend::<String>::builder().max_entries(10_000).build());
    cache
        .register(KeyPolicy::new("user/{id}").read_through(|ctx: KeyContext| async move {
            Ok::<_, CallbackError>(ctx.key().to_owned())
        }))
        .unwrap();
    runtime.block_on(cache.get("user/1")).unwrap();

    c.bench_function("get/read_through_hit", |b| {
        b.to_async(&runtime).iter(|| async {
            cache.get(black_box("user/1")).await.unwrap();
        });
    });
}

criterion_group!(benches, bench_resolve, bench_get);
criterion_main!(benches);
