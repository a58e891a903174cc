use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::store::{StoreResult, StoreStats};

pub mod exporters;

/// Metrics collector for aggregation store operations
#[derive(Debug)]
pub struct StoreMetrics {
    // Latency tracking
    insert_latency: LatencyTracker,
    remove_latency: LatencyTracker,
    price_range_latency: LatencyTracker,
    enumerate_latency: LatencyTracker,

    // Throughput counters
    inserts: AtomicU64,
    removals: AtomicU64,
    not_found: AtomicU64,
    quantity_inserted: AtomicU64,

    // Last observed store shape
    last_stats: RwLock<StoreStats>,
}

impl StoreMetrics {
    pub fn new() -> Self {
        // Register metric descriptions
        describe_counter!("store_operations_total", "Total number of store operations");
        describe_counter!(
            "store_not_found_total",
            "Operations that found no book for the symbol"
        );
        describe_counter!("store_quantity_total", "Total quantity inserted");
        describe_histogram!(
            "store_operation_duration_seconds",
            "Duration of store operations"
        );
        describe_gauge!("store_symbols_current", "Symbols with a book");
        describe_gauge!("store_levels_current", "Price levels across all books");

        Self {
            insert_latency: LatencyTracker::new("insert"),
            remove_latency: LatencyTracker::new("remove"),
            price_range_latency: LatencyTracker::new("price_range"),
            enumerate_latency: LatencyTracker::new("enumerate"),
            inserts: AtomicU64::new(0),
            removals: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            quantity_inserted: AtomicU64::new(0),
            last_stats: RwLock::new(StoreStats::default()),
        }
    }

    // Latency measurement methods
    pub fn time_insert<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.insert_latency.time(f)
    }

    pub fn time_remove<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.remove_latency.time(f)
    }

    pub fn time_price_range<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.price_range_latency.time(f)
    }

    pub fn time_enumerate<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.enumerate_latency.time(f)
    }

    // Counter methods
    pub fn record_insert(&self, quantity: u64) {
        self.record_inserts(1, quantity);
    }

    /// Count `count` inserts made outside the timed path, `quantity` in total
    pub fn record_inserts(&self, count: u64, quantity: u64) {
        self.inserts.fetch_add(count, Ordering::Relaxed);
        self.quantity_inserted.fetch_add(quantity, Ordering::Relaxed);
        counter!("store_operations_total", "operation" => "insert").increment(count);
        counter!("store_quantity_total").increment(quantity);
    }

    pub fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
        counter!("store_operations_total", "operation" => "remove").increment(1);
    }

    pub fn record_not_found(&self, operation: &'static str) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
        counter!("store_not_found_total", "operation" => operation).increment(1);
    }

    /// Count a `NotFound` outcome, pass the result through untouched
    pub fn observe<T>(&self, operation: &'static str, result: StoreResult<T>) -> StoreResult<T> {
        if matches!(&result, Err(e) if e.is_not_found()) {
            self.record_not_found(operation);
        }
        result
    }

    // Gauge methods
    pub fn record_stats(&self, stats: &StoreStats) {
        *self.last_stats.write() = *stats;
        gauge!("store_symbols_current").set(stats.symbols as f64);
        gauge!("store_levels_current").set(stats.price_levels as f64);
    }

    // Getters for current values
    pub fn get_inserts(&self) -> u64 {
        self.inserts.load(Ordering::Relaxed)
    }

    pub fn get_removals(&self) -> u64 {
        self.removals.load(Ordering::Relaxed)
    }

    pub fn get_not_found(&self) -> u64 {
        self.not_found.load(Ordering::Relaxed)
    }

    pub fn get_quantity_inserted(&self) -> u64 {
        self.quantity_inserted.load(Ordering::Relaxed)
    }

    pub fn get_last_stats(&self) -> StoreStats {
        *self.last_stats.read()
    }

    pub fn get_latency_stats(&self) -> LatencyStats {
        LatencyStats {
            insert: self.insert_latency.get_stats(),
            remove: self.remove_latency.get_stats(),
            price_range: self.price_range_latency.get_stats(),
            enumerate: self.enumerate_latency.get_stats(),
        }
    }
}

impl Default for StoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency tracker for individual operations
#[derive(Debug)]
struct LatencyTracker {
    operation: &'static str,
    samples: AtomicU64,
    total_nanos: AtomicU64,
    min_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl LatencyTracker {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            samples: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
            min_nanos: AtomicU64::new(u64::MAX),
            max_nanos: AtomicU64::new(0),
        }
    }

    fn time<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record_latency(start.elapsed());
        result
    }

    fn record_latency(&self, duration: Duration) {
        let nanos = duration.as_nanos() as u64;

        self.samples.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.min_nanos.fetch_min(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);

        histogram!("store_operation_duration_seconds", "operation" => self.operation)
            .record(duration.as_secs_f64());
    }

    fn get_stats(&self) -> OperationLatencyStats {
        let samples = self.samples.load(Ordering::Relaxed);
        let total = self.total_nanos.load(Ordering::Relaxed);
        let min = self.min_nanos.load(Ordering::Relaxed);
        let max = self.max_nanos.load(Ordering::Relaxed);

        OperationLatencyStats {
            operation: self.operation,
            samples,
            avg_nanos: if samples > 0 { total / samples } else { 0 },
            min_nanos: if min == u64::MAX { 0 } else { min },
            max_nanos: max,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub insert: OperationLatencyStats,
    pub remove: OperationLatencyStats,
    pub price_range: OperationLatencyStats,
    pub enumerate: OperationLatencyStats,
}

#[derive(Debug, Clone)]
pub struct OperationLatencyStats {
    pub operation: &'static str,
    pub samples: u64,
    pub avg_nanos: u64,
    pub min_nanos: u64,
    pub max_nanos: u64,
}

impl OperationLatencyStats {
    pub fn avg_micros(&self) -> f64 {
        self.avg_nanos as f64 / 1_000.0
    }

    pub fn max_micros(&self) -> f64 {
        self.max_nanos as f64 / 1_000.0
    }
}

/// Background metrics reporter
pub struct MetricsReporter {
    metrics: Arc<StoreMetrics>,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<StoreMetrics>, interval: Duration) -> Self {
        Self { metrics, interval }
    }

    pub async fn run(&self) {
        let mut interval = interval(self.interval);

        loop {
            interval.tick().await;
            self.report();
        }
    }

    pub fn report(&self) {
        let stats = self.metrics.get_latency_stats();
        let shape = self.metrics.get_last_stats();

        info!(
            "Store Metrics - Inserts: {} (qty {}) | Removals: {} | NotFound: {} | Symbols: {} Levels: {} | Latency (μs): insert={:.2} (max {:.2}) remove={:.2} range={:.2} enumerate={:.2}",
            self.metrics.get_inserts(),
            self.metrics.get_quantity_inserted(),
            self.metrics.get_removals(),
            self.metrics.get_not_found(),
            shape.symbols,
            shape.price_levels,
            stats.insert.avg_micros(),
            stats.insert.max_micros(),
            stats.remove.avg_micros(),
            stats.price_range.avg_micros(),
            stats.enumerate.avg_micros()
        );
    }
}
