//! Core aggregation store module
//!
//! Maintains, per symbol, one aggregated quantity per distinct price and
//! answers price-range queries and whole-symbol removal.

pub mod aggregation;
pub mod book;
pub mod error;
pub mod price_level;
pub mod types;

// Re-export main types for convenience
pub use aggregation::{AggregationStore, StoreStats};
pub use book::Book;
pub use error::{StoreError, StoreResult};
pub use price_level::PriceLevel;
pub use types::{
    Price, PriceLevelInfo, PriceRange, Quantity, StoreSnapshot, Symbol, SymbolSnapshot,
    TotalQuantity,
};
