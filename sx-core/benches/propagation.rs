//! Benchmarks for push propagation and pull resolution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sx_core::prelude::*;

fn deep_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_chain");
    for depth in [10usize, 100, 1_000] {
        let graph = Graph::new();
        let root = graph.state(0u64);
        let mut last = root.map(|x| x + 1);
        for _ in 1..depth {
            last = last.map(|x| x + 1);
        }

        group.bench_with_input(BenchmarkId::new("write_then_read", depth), &depth, |b, _| {
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                root.set(i);
                black_box(last.value().unwrap())
            });
        });
    }
    group.finish();
}

fn wide_diamond(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_diamond");
    for width in [10usize, 100, 1_000] {
        let graph = Graph::new();
        let root = graph.state(0u64);
        let arms: Vec<State<u64>> = (0..width as u64).map(|k| root.map(move |x| x + k)).collect();
        let join = graph
            .combine(&arms, |values| values.iter().copied().sum::<u64>())
            .unwrap();
        let tail = join.map(|x| x / 2);

        group.bench_with_input(BenchmarkId::new("write_then_read", width), &width, |b, _| {
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                root.set(i);
                black_box(tail.value().unwrap())
            });
        });

        group.bench_with_input(BenchmarkId::new("write_only", width), &width, |b, _| {
            let mut i = 0u64;
            b.iter(|| {
                i += 1;
                root.set(black_box(i));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, deep_chain, wide_diamond);
criterion_main!(benches);
