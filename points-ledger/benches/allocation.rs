//! Benchmarks for spend allocation
//!
//! Measures performance of:
//! - Recording contributions into the queue
//! - Spends that walk many small contributions

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use points_ledger::{Contribution, SpendAllocator};

const PAYERS: [&str; 4] = ["DANNON", "UNILEVER", "MILLER COORS", "KRAFT"];

fn filled_allocator(count: usize) -> SpendAllocator {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mut allocator = SpendAllocator::new();
    for i in 0..count {
        // Scatter timestamps so the heap does real work
        let offset = ((i * 7919) % count) as i64;
        allocator
            .record_contribution(Contribution::new(
                PAYERS[i % PAYERS.len()],
                10,
                start + Duration::minutes(offset),
            ))
            .unwrap();
    }
    allocator
}

/// Benchmark recording contributions
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_contribution");

    for &count in &[100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &n| {
            b.iter(|| filled_allocator(black_box(n)))
        });
    }
    group.finish();
}

/// Benchmark spends that consume half of all outstanding contributions
fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_spend");

    for &count in &[100usize, 1_000, 10_000] {
        let amount = (count as i64 * 10) / 2;
        group.throughput(Throughput::Elements(count as u64 / 2));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &n| {
            b.iter_batched(
                || filled_allocator(n),
                |mut allocator| allocator.allocate_spend(black_box(amount)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_record, bench_allocate);
criterion_main!(benches);
