use dashmap::DashMap;
use tracing::debug;

use crate::config::StoreConfig;
use crate::store::book::Book;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{
    Price, PriceLevelInfo, PriceRange, Quantity, StoreSnapshot, Symbol, SymbolSnapshot,
    TotalQuantity,
};

/// Concurrent store aggregating quantity per (symbol, price)
///
/// Symbols are striped across the shards of a `DashMap`. Every access to a
/// book, including reads of its quantities, happens under the lock of the
/// shard holding it, so operations on one symbol are linearizable while
/// operations on symbols in different shards never contend.
#[derive(Debug)]
pub struct AggregationStore {
    books: DashMap<Symbol, Book>,
}

impl AggregationStore {
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        let shard_amount = config.normalized_shard_amount();
        debug!(
            "Creating aggregation store with {} shards, capacity {}",
            shard_amount, config.initial_capacity
        );

        Self {
            books: DashMap::with_capacity_and_shard_amount(config.initial_capacity, shard_amount),
        }
    }

    /// Add `quantity` at `price` for `symbol`, creating the book and level
    /// on first use
    pub fn insert(&self, symbol: &str, price: Price, quantity: Quantity) {
        if let Some(mut book) = self.books.get_mut(symbol) {
            book.insert(price, quantity);
            return;
        }

        // The book may have been created between the lookup and here;
        // `entry` resolves that under the shard write lock.
        self.books
            .entry(symbol.to_string())
            .or_insert_with(|| {
                debug!("Creating book for symbol: {}", symbol);
                Book::new()
            })
            .insert(price, quantity);
    }

    /// Drop the whole book of `symbol`
    pub fn remove(&self, symbol: &str) -> StoreResult<()> {
        self.take(symbol).map(|_| ())
    }

    /// Drop the whole book of `symbol`, returning the levels it held
    pub fn take(&self, symbol: &str) -> StoreResult<SymbolSnapshot> {
        match self.books.remove(symbol) {
            Some((symbol, book)) => {
                debug!("Removed book for {} with {} levels", symbol, book.len());
                Ok(SymbolSnapshot {
                    symbol,
                    levels: book.level_infos(),
                })
            }
            None => Err(StoreError::symbol_not_found(symbol)),
        }
    }

    /// Lowest and highest price recorded for `symbol`
    pub fn price_range(&self, symbol: &str) -> StoreResult<PriceRange> {
        self.books
            .get(symbol)
            .and_then(|book| book.price_range())
            .ok_or_else(|| StoreError::symbol_not_found(symbol))
    }

    /// Levels of a single symbol in creation order
    pub fn levels(&self, symbol: &str) -> StoreResult<Vec<PriceLevelInfo>> {
        self.books
            .get(symbol)
            .map(|book| book.level_infos())
            .ok_or_else(|| StoreError::symbol_not_found(symbol))
    }

    /// Every symbol with its levels.
    ///
    /// Each symbol is copied while its shard is read-locked; no shard lock
    /// is held once this returns, so callers may write to the store while
    /// consuming the iterator. Call again for a fresh view.
    pub fn enumerate(&self) -> impl Iterator<Item = SymbolSnapshot> {
        let entries: Vec<SymbolSnapshot> = self
            .books
            .iter()
            .map(|entry| SymbolSnapshot {
                symbol: entry.key().clone(),
                levels: entry.value().level_infos(),
            })
            .collect();

        entries.into_iter()
    }

    /// Timestamped view of the whole store, symbols in lexical order
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut symbols: Vec<_> = self.enumerate().collect();
        symbols.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        StoreSnapshot {
            timestamp: chrono::Utc::now(),
            symbols,
        }
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.books.contains_key(symbol)
    }

    /// Number of symbols with a book
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::default();

        for entry in self.books.iter() {
            let book = entry.value();
            stats.symbols += 1;
            stats.price_levels += book.len();
            stats.total_quantity += book.total_quantity();
        }

        stats
    }
}

impl Default for AggregationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub symbols: usize,
    pub price_levels: usize,
    pub total_quantity: TotalQuantity,
}
