//! Aggregation Store Demo
//!
//! Drives the store from independent tasks and threads, times each phase and
//! renders the aggregated books to the log.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use aggregation_store::{
    metrics::{exporters::install_prometheus_exporter, MetricsReporter},
    utils::{
        format_range, parse_symbols,
        time::{time_phase, LatencyTimer},
    },
    AggregationStore, Price, StoreConfig, StoreMetrics,
};
use rayon::prelude::*;

const DEFAULT_SYMBOLS: &str =
    "NESTLEIND,HDFCBANK,RELIANCE,TCS,INFY,SBIN,ICICIBANK,LT,BAJFINANCE,HINDUNILVR";

/// Demo settings, loaded from environment variables with defaults
#[derive(Debug, Clone)]
struct DemoConfig {
    symbols: Vec<String>,
    workers: usize,
    bulk_inserts: u64,
    metrics_addr: Option<SocketAddr>,
    report_interval: Duration,
}

impl DemoConfig {
    /// Environment variables:
    /// - `AGG_DEMO_SYMBOLS` comma-separated, at least two (default: ten NSE tickers)
    /// - `AGG_DEMO_WORKERS` (default: 8)
    /// - `AGG_DEMO_BULK_INSERTS` (default: 100000)
    /// - `AGG_METRICS_ADDR` e.g. `0.0.0.0:9090` (default: unset, no exporter)
    /// - `AGG_METRICS_INTERVAL_SECS` (default: 5)
    fn from_env() -> Self {
        let symbols = env::var("AGG_DEMO_SYMBOLS")
            .map(|list| parse_symbols(&list))
            .ok()
            .filter(|symbols| symbols.len() >= 2)
            .unwrap_or_else(|| parse_symbols(DEFAULT_SYMBOLS));

        Self {
            symbols,
            workers: env::var("AGG_DEMO_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(8),
            bulk_inserts: env::var("AGG_DEMO_BULK_INSERTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100_000),
            metrics_addr: env::var("AGG_METRICS_ADDR")
                .ok()
                .and_then(|s| s.parse().ok()),
            report_interval: Duration::from_secs(
                env::var("AGG_METRICS_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DemoConfig::from_env();
    info!(
        "Starting aggregation demo with {} symbols, {} workers",
        config.symbols.len(),
        config.workers
    );

    if let Some(addr) = config.metrics_addr {
        if let Err(e) = install_prometheus_exporter(addr) {
            error!("Failed to start metrics exporter: {}", e);
        }
    }

    let store = Arc::new(AggregationStore::with_config(&StoreConfig::from_env()));
    let metrics = Arc::new(StoreMetrics::new());

    let reporter = MetricsReporter::new(Arc::clone(&metrics), config.report_interval);
    let reporter_handle = tokio::spawn(async move {
        reporter.run().await;
    });

    let first = config.symbols[0].clone();
    let second = config.symbols[1].clone();

    // Initial inserts, one task per symbol
    let timer = LatencyTimer::start();
    let mut tasks = Vec::new();
    for symbol in &config.symbols {
        let store = Arc::clone(&store);
        let metrics = Arc::clone(&metrics);
        let symbol = symbol.clone();
        tasks.push(tokio::spawn(async move {
            metrics.time_insert(|| store.insert(&symbol, 2, 10));
            metrics.record_insert(10);
        }));
    }
    for task in tasks {
        task.await?;
    }
    timer.log("initial inserts");

    // Add to an existing level and open a new one concurrently
    let timer = LatencyTimer::start();
    let existing = {
        let (store, metrics, symbol) = (Arc::clone(&store), Arc::clone(&metrics), first.clone());
        tokio::spawn(async move {
            metrics.time_insert(|| store.insert(&symbol, 2, 20));
            metrics.record_insert(20);
        })
    };
    let fresh = {
        let (store, metrics, symbol) = (Arc::clone(&store), Arc::clone(&metrics), second.clone());
        tokio::spawn(async move {
            metrics.time_insert(|| store.insert(&symbol, 4, 15));
            metrics.record_insert(15);
        })
    };
    existing.await?;
    fresh.await?;
    timer.log("additional inserts");

    time_phase("display", || display(&store, &metrics));

    // Removal from its own task
    let timer = LatencyTimer::start();
    let removal = {
        let (store, metrics, symbol) = (Arc::clone(&store), Arc::clone(&metrics), first.clone());
        tokio::spawn(async move {
            match metrics.observe("remove", metrics.time_remove(|| store.remove(&symbol))) {
                Ok(()) => {
                    metrics.record_removal();
                    info!("Removed {}", symbol);
                }
                Err(e) => warn!("Removal failed: {}", e),
            }
        })
    };
    removal.await?;
    timer.log("removal");

    time_phase("display after removal", || display(&store, &metrics));

    // Price range from its own task, plus the removed symbol for contrast
    let timer = LatencyTimer::start();
    let ranges = {
        let (store, metrics) = (Arc::clone(&store), Arc::clone(&metrics));
        let symbols = vec![second.clone(), first.clone()];
        tokio::spawn(async move {
            for symbol in symbols {
                match metrics.observe(
                    "price_range",
                    metrics.time_price_range(|| store.price_range(&symbol)),
                ) {
                    Ok(range) => info!("Price range for {}: {}", symbol, format_range(&range)),
                    Err(e) => warn!("Price range unavailable: {}", e),
                }
            }
        })
    };
    ranges.await?;
    timer.log("price range");

    // Parallel bulk contributions spread over every symbol and ten prices
    let timer = LatencyTimer::start();
    let bulk_total = {
        let (store, symbols, count) = (
            Arc::clone(&store),
            config.symbols.clone(),
            config.bulk_inserts,
        );
        tokio::task::spawn_blocking(move || {
            let before = store.stats().total_quantity;
            (0..count).into_par_iter().for_each(|i| {
                let symbol = &symbols[(i as usize) % symbols.len()];
                store.insert(symbol, 100 + (i % 10) as Price, 1);
            });
            store.stats().total_quantity - before
        })
        .await?
    };
    timer.log("bulk parallel inserts");
    metrics.record_inserts(config.bulk_inserts, config.bulk_inserts);
    if bulk_total != u128::from(config.bulk_inserts) {
        error!(
            "Bulk aggregation mismatch: expected {}, stored {}",
            config.bulk_inserts, bulk_total
        );
    }

    // Scoped threads hammering a single level
    let timer = LatencyTimer::start();
    let per_worker = 10_000u64;
    let (hot_quantity, workers) = {
        let (store, workers) = (Arc::clone(&store), config.workers);
        tokio::task::spawn_blocking(move || {
            let store = &*store;
            crossbeam::thread::scope(|s| {
                for _ in 0..workers {
                    s.spawn(move |_| {
                        for _ in 0..per_worker {
                            store.insert("HOT", 0, 1);
                        }
                    });
                }
            })
            .map_err(|_| "contention worker panicked")?;

            let quantity = store
                .levels("HOT")
                .map_err(|e| e.to_string())?
                .first()
                .map(|level| level.quantity)
                .unwrap_or_default();
            Ok::<_, String>((quantity, workers))
        })
        .await??
    };
    timer.log("contended single-level inserts");

    let expected = per_worker * workers as u64;
    metrics.record_inserts(expected, expected);
    if hot_quantity == expected {
        info!("HOT level aggregated {} from {} workers", hot_quantity, workers);
    } else {
        error!(
            "HOT level lost updates: expected {}, stored {}",
            expected, hot_quantity
        );
    }

    metrics.record_stats(&store.stats());
    MetricsReporter::new(Arc::clone(&metrics), config.report_interval).report();

    let snapshot = metrics.time_enumerate(|| store.snapshot());
    debug!("Final snapshot: {}", serde_json::to_string(&snapshot)?);

    reporter_handle.abort();
    info!("Aggregation demo finished");
    Ok(())
}

/// Log every symbol with its levels
fn display(store: &AggregationStore, metrics: &StoreMetrics) {
    let snapshot = metrics.time_enumerate(|| store.snapshot());
    for entry in &snapshot.symbols {
        info!("{}", entry);
    }
    metrics.record_stats(&store.stats());
}
