//! Store configuration
//!
//! Loaded from environment variables with defaults, or deserialized as part
//! of a larger configuration document.

use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_SHARD_AMOUNT: usize = 64;
pub const DEFAULT_INITIAL_CAPACITY: usize = 0;
pub const MAX_SHARD_AMOUNT: usize = 1 << 16;

/// Sizing of the symbol map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of lock stripes. Rounded up to a power of two, between 2 and
    /// `MAX_SHARD_AMOUNT`.
    pub shard_amount: usize,

    /// Symbols to reserve room for up front
    pub initial_capacity: usize,
}

impl StoreConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `AGG_STORE_SHARDS` (default: 64)
    /// - `AGG_STORE_CAPACITY` (default: 0)
    pub fn from_env() -> Self {
        Self {
            shard_amount: env::var("AGG_STORE_SHARDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SHARD_AMOUNT),

            initial_capacity: env::var("AGG_STORE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_INITIAL_CAPACITY),
        }
    }

    /// Shard count accepted by the concurrent map
    pub fn normalized_shard_amount(&self) -> usize {
        self.shard_amount
            .clamp(2, MAX_SHARD_AMOUNT)
            .next_power_of_two()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            shard_amount: DEFAULT_SHARD_AMOUNT,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}
