//! Benchmarks for aggregation store operations

use aggregation_store::{AggregationStore, Price};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayon::prelude::*;

const SYMBOLS: [&str; 10] = [
    "NESTLEIND",
    "HDFCBANK",
    "RELIANCE",
    "TCS",
    "INFY",
    "SBIN",
    "ICICIBANK",
    "LT",
    "BAJFINANCE",
    "HINDUNILVR",
];

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_insert");
    group.throughput(Throughput::Elements(1));

    let store = AggregationStore::new();
    group.bench_function("existing_level", |b| {
        b.iter(|| store.insert(black_box("TCS"), black_box(2), black_box(1)))
    });

    // Linear scan cost grows with the number of distinct prices per symbol
    for levels in [1usize, 8, 64] {
        let store = AggregationStore::new();
        for price in 0..levels {
            store.insert("INFY", price as Price, 1);
        }
        let last = (levels - 1) as Price;

        group.bench_with_input(BenchmarkId::new("scan_to_last", levels), &last, |b, &price| {
            b.iter(|| store.insert(black_box("INFY"), black_box(price), 1))
        });
    }

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_queries");

    let store = AggregationStore::new();
    for (i, symbol) in SYMBOLS.iter().enumerate() {
        for price in 0..16 {
            store.insert(symbol, price * (i as Price + 1), 10);
        }
    }

    group.bench_function("price_range", |b| {
        b.iter(|| store.price_range(black_box("RELIANCE")))
    });
    group.bench_function("price_range_missing", |b| {
        b.iter(|| store.price_range(black_box("MISSING")))
    });
    group.bench_function("enumerate", |b| b.iter(|| store.enumerate().count()));

    group.finish();
}

fn benchmark_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_parallel");
    let batch = 10_000u64;
    group.throughput(Throughput::Elements(batch));

    group.bench_function("many_symbols", |b| {
        let store = AggregationStore::new();
        b.iter(|| {
            (0..batch).into_par_iter().for_each(|i| {
                store.insert(SYMBOLS[(i % 10) as usize], (i % 4) as Price, 1);
            })
        })
    });

    group.bench_function("single_symbol", |b| {
        let store = AggregationStore::new();
        b.iter(|| {
            (0..batch).into_par_iter().for_each(|i| {
                store.insert("HOT", (i % 4) as Price, 1);
            })
        })
    });

    group.bench_function("insert_remove_churn", |b| {
        let store = AggregationStore::new();
        b.iter(|| {
            SYMBOLS.par_iter().for_each(|symbol| {
                for price in 0..8 {
                    store.insert(symbol, price, 1);
                }
                let _ = store.remove(symbol);
            })
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_queries,
    benchmark_parallel
);
criterion_main!(benches);
