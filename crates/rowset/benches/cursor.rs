//! Cursor navigation benchmarks.
//!
//! Covers the two traversal shapes that dominate real use:
//! - draining a streamed result front to back
//! - scroll navigation that revisits cached rows

#![allow(missing_docs)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use rowset::{Cursor, ForwardCursor, MemoryRowSource, Row, Schema, ScrollCursor, Value};

const ROWS: u64 = 10_000;

fn bench_rows(n: u64) -> Vec<Row> {
    let schema = Arc::new(Schema::new(vec!["id".to_string(), "label".to_string()]));
    (0..n as i64)
        .map(|i| {
            Row::new(Arc::clone(&schema), vec![Value::Int(i), Value::String(format!("row-{i}"))])
        })
        .collect()
}

fn forward_drain(c: &mut Criterion) {
    let rows = bench_rows(ROWS);
    let mut group = c.benchmark_group("forward_drain");
    group.throughput(Throughput::Elements(ROWS));
    group.bench_function("next_to_exhaustion", |b| {
        b.iter(|| {
            let mut cursor = ForwardCursor::new(MemoryRowSource::new(rows.clone()));
            while cursor.next().expect("next failed") {
                black_box(cursor.current_row());
            }
        });
    });
    group.finish();
}

fn scroll_navigation(c: &mut Criterion) {
    let rows = bench_rows(ROWS);
    let mut group = c.benchmark_group("scroll_navigation");

    group.throughput(Throughput::Elements(ROWS));
    group.bench_function("zigzag_over_cached_rows", |b| {
        b.iter(|| {
            let mut cursor = ScrollCursor::new(MemoryRowSource::new(rows.clone()));
            cursor.after_last().expect("after_last failed");
            // Every step from here on replays the caches.
            while cursor.previous().expect("previous failed") {
                black_box(cursor.current_row());
            }
            while cursor.next().expect("next failed") {
                black_box(cursor.current_row());
            }
        });
    });

    group.bench_function("absolute_hops", |b| {
        b.iter(|| {
            let mut cursor = ScrollCursor::new(MemoryRowSource::new(rows.clone()));
            for target in [-1i64, 1, ROWS as i64 / 2, -(ROWS as i64 / 4), 7] {
                black_box(cursor.absolute(target).expect("absolute failed"));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, forward_drain, scroll_navigation);
criterion_main!(benches);
