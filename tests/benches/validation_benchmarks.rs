//! # Stats Validation Benchmarks
//!
//! | Path | What runs |
//! |------|-----------|
//! | `validate_name` | character rules on one string |
//! | `validate_call` | name plus every tag key and value |
//! | `mock_store` | validate, delegate, flush |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stats_core::tags::tag_set;
use stats_core::{NullSink, Scope, StatStore, TagSet};
use stats_mock::{validate_call, validate_name, MockStore};

// ============================================================================
// Validator
// ============================================================================

fn bench_validate_name(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_name");

    for len in [8usize, 64, 512] {
        let valid = "a".repeat(len);
        let invalid = format!("{} ", "a".repeat(len - 1));

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("valid", len), &valid, |b, name| {
            b.iter(|| black_box(validate_name(black_box(name)).is_ok()))
        });
        group.bench_with_input(BenchmarkId::new("whitespace", len), &invalid, |b, name| {
            b.iter(|| black_box(validate_name(black_box(name)).is_err()))
        });
    }

    group.finish();
}

fn bench_validate_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate_call");

    for count in [0usize, 4, 16] {
        let tags: TagSet = (0..count)
            .map(|i| (format!("key_{}", i), format!("value_{}", i)))
            .collect();

        group.throughput(Throughput::Elements(count as u64 + 1));
        group.bench_with_input(BenchmarkId::new("tags", count), &tags, |b, tags| {
            b.iter(|| black_box(validate_call(black_box("http.requests"), tags).len()))
        });
    }

    group.finish();
}

// ============================================================================
// Store
// ============================================================================

fn bench_stat_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("stat_creation");
    let tags = tag_set([("method", "GET"), ("status", "200")]);

    let plain = StatStore::new(Arc::new(NullSink));
    group.bench_function("stat_store", |b| {
        b.iter(|| black_box(plain.new_counter_with_tags("requests", &tags)))
    });

    let mock = MockStore::silent();
    group.bench_function("mock_store", |b| {
        b.iter(|| black_box(mock.new_counter_with_tags("requests", &tags)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_validate_name,
    bench_validate_call,
    bench_stat_creation
);
criterion_main!(benches);
