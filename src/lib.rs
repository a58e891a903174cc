//! Concurrent Aggregation Store
//!
//! An in-memory store that receives (symbol, price, quantity) contributions
//! from many threads and keeps, per symbol, one aggregated quantity per
//! distinct price.
//!
//! # Features
//!
//! - **Striped Locking**: symbols are spread over the shards of a `DashMap`
//! - **Exact Aggregation**: concurrent inserts at one price never lose updates
//! - **Explicit Outcomes**: absent symbols yield `StoreError::SymbolNotFound`
//! - **Monitoring**: optional latency and throughput metrics with Prometheus export
//!
//! # Quick Start
//!
//! ```rust
//! use aggregation_store::{AggregationStore, PriceRange};
//!
//! let store = AggregationStore::new();
//!
//! store.insert("RELIANCE", 2, 10);
//! store.insert("RELIANCE", 2, 20);
//! store.insert("RELIANCE", 1, 5);
//!
//! assert_eq!(store.price_range("RELIANCE")?, PriceRange::new(1, 2));
//!
//! store.remove("RELIANCE")?;
//! assert!(store.price_range("RELIANCE").is_err());
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! 1. **Symbols**: `DashMap<Symbol, Book>`, each shard guarded by its own lock
//! 2. **Books**: a small `Vec` of price levels per symbol, matched by linear scan
//!
//! A book and its levels are only reachable under their shard's lock, which
//! makes removal of a symbol atomic for every concurrent reader and writer.

pub mod config;
pub mod metrics;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::StoreConfig;
pub use store::{
    error::{StoreError, StoreResult},
    types::{
        Price, PriceLevelInfo, PriceRange, Quantity, StoreSnapshot, Symbol, SymbolSnapshot,
        TotalQuantity,
    },
    AggregationStore, StoreStats,
};

pub use crate::metrics::StoreMetrics;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_aggregation_workflow() {
        let store = AggregationStore::new();

        store.insert("NESTLEIND", 2, 10);
        store.insert("NESTLEIND", 2, 20);
        store.insert("HDFCBANK", 2, 10);
        store.insert("HDFCBANK", 4, 15);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.get("NESTLEIND").unwrap().quantity_at(2), Some(30));
        assert_eq!(
            store.price_range("HDFCBANK").unwrap(),
            PriceRange::new(2, 4)
        );

        store.remove("NESTLEIND").unwrap();
        assert!(store.snapshot().get("NESTLEIND").is_none());
        assert!(store.remove("NESTLEIND").unwrap_err().is_not_found());
    }

    #[test]
    fn test_concurrent_aggregation() {
        let store = Arc::new(AggregationStore::new());
        let mut handles = vec![];

        // Spawn multiple contributing threads
        for thread_id in 0..4 {
            let store_clone = Arc::clone(&store);
            let handle = thread::spawn(move || {
                for i in 0..100 {
                    let price = (thread_id * 100 + i) as Price;
                    store_clone.insert("TEST", price, 1);
                    store_clone.insert("TEST", 0, 1);
                }
            });
            handles.push(handle);
        }

        // Wait for completion
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = store.stats();
        assert_eq!(stats.symbols, 1);
        // Price 0 is also one of thread 0's prices
        assert_eq!(stats.price_levels, 400);
        assert_eq!(stats.total_quantity, 800);
        assert_eq!(store.price_range("TEST").unwrap(), PriceRange::new(0, 399));
    }

    #[test]
    fn test_store_shared_across_tasks() {
        let store = Arc::new(AggregationStore::new());
        let symbols = ["SBIN", "ICICIBANK", "LT", "BAJFINANCE", "HINDUNILVR"];

        tokio_test::block_on(async {
            let mut tasks = Vec::new();
            for symbol in symbols {
                let store = Arc::clone(&store);
                tasks.push(tokio::spawn(async move {
                    store.insert(symbol, 2, 10);
                }));
            }
            for task in tasks {
                task.await.unwrap();
            }
        });

        assert_eq!(store.len(), symbols.len());
        for symbol in symbols {
            assert_eq!(store.levels(symbol).unwrap()[0].quantity, 10);
        }
    }

    #[test]
    fn test_configured_store() {
        let config = StoreConfig {
            shard_amount: 4,
            initial_capacity: 8,
        };
        let store = AggregationStore::with_config(&config);
        let metrics = StoreMetrics::new();

        metrics.time_insert(|| store.insert("TCS", 7, 3));
        metrics.record_insert(3);
        let result = metrics.observe("remove", metrics.time_remove(|| store.remove("INFY")));

        assert!(result.is_err());
        assert_eq!(metrics.get_not_found(), 1);
        assert_eq!(store.levels("TCS").unwrap()[0].quantity, 3);
    }
}
