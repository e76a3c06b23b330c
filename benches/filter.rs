//! Criterion benchmarks for insert, query, and delete paths.

use bloomscale::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn keys(count: usize) -> Vec<[u8; 8]> {
    (0..count as u64).map(|i| i.to_le_bytes()).collect()
}

fn bench_partitioned_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitioned/add");
    for &capacity in &[1_000usize, 100_000] {
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let items = keys(capacity);
                b.iter(|| {
                    let mut filter = PartitionedCountingFilter::new(capacity, 0.01).unwrap();
                    for key in &items {
                        filter.add(black_box(key));
                    }
                    filter
                });
            },
        );
    }
    group.finish();
}

fn bench_partitioned_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("partitioned/query");
    let capacity = 100_000;
    let items = keys(capacity);
    let mut filter = PartitionedCountingFilter::new(capacity, 0.01).unwrap();
    for key in &items {
        filter.add(key);
    }
    let absent: Vec<[u8; 8]> = (0..10_000u64)
        .map(|i| (i + capacity as u64).to_le_bytes())
        .collect();

    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("hit", |b| {
        b.iter(|| {
            items
                .iter()
                .filter(|key| filter.query(black_box(*key)))
                .count()
        });
    });
    group.throughput(Throughput::Elements(absent.len() as u64));
    group.bench_function("miss", |b| {
        b.iter(|| {
            absent
                .iter()
                .filter(|key| filter.query(black_box(*key)))
                .count()
        });
    });
    group.finish();
}

fn bench_partitioned_delete(c: &mut Criterion) {
    let capacity = 10_000;
    let items = keys(capacity);
    c.bench_function("partitioned/delete", |b| {
        b.iter_batched(
            || {
                let mut filter = PartitionedCountingFilter::new(capacity, 0.01).unwrap();
                for key in &items {
                    filter.add(key);
                }
                filter
            },
            |mut filter| {
                for key in &items {
                    let _ = filter.delete(black_box(key));
                }
                filter
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_chain_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/add");
    let total = 50_000;
    let items = keys(total);
    group.throughput(Throughput::Elements(total as u64));
    group.bench_function("growing", |b| {
        b.iter(|| {
            let mut chain = ScalableFilterChain::new(1_000, 0.01).unwrap();
            for key in &items {
                chain.add(black_box(key));
            }
            chain
        });
    });
    group.finish();
}

fn bench_chain_contains(c: &mut Criterion) {
    let total = 50_000;
    let items = keys(total);
    let mut chain = ScalableFilterChain::new(1_000, 0.01).unwrap();
    for key in &items {
        chain.add(key);
    }

    let mut group = c.benchmark_group("chain/contains");
    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("hit", |b| {
        b.iter(|| {
            items
                .iter()
                .filter(|key| chain.contains(black_box(*key)))
                .count()
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_partitioned_add,
    bench_partitioned_query,
    bench_partitioned_delete,
    bench_chain_add,
    bench_chain_contains
);
criterion_main!(benches);
