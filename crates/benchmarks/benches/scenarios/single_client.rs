//! Uncontended round trips.

use criterion::{black_box, BenchmarkId, Criterion};
use rand::Rng;
use so_benchmarks::utils::{fresh_store, runtime};
use state_owner::Strategy;

pub fn register_benchmarks(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("single_client");

    for strategy in Strategy::ALL {
        let store = rt.block_on(async { fresh_store(strategy) });

        group.bench_with_input(BenchmarkId::new("read", strategy), &strategy, |b, _| {
            b.to_async(&rt).iter(|| {
                let store = store.clone();
                async move { black_box(store.read(black_box(3)).await) }
            });
        });

        group.bench_with_input(BenchmarkId::new("write", strategy), &strategy, |b, _| {
            b.to_async(&rt).iter(|| {
                let store = store.clone();
                let value = rand::thread_rng().gen_range(0..100);
                async move { black_box(store.write(black_box(3), value).await) }
            });
        });

        rt.block_on(async {
            let _ = store.shutdown().await;
        });
    }

    group.finish();
}
