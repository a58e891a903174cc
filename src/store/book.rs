use crate::store::price_level::PriceLevel;
use crate::store::types::{Price, PriceLevelInfo, PriceRange, Quantity, TotalQuantity};

/// Price levels of a single symbol, at most one per distinct price.
///
/// Levels are kept in creation order and matched by linear scan; the number
/// of distinct prices per symbol is expected to stay small.
#[derive(Debug, Clone, Default)]
pub struct Book {
    levels: Vec<PriceLevel>,
}

impl Book {
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    /// Add `quantity` at `price`, creating the level on first use
    pub fn insert(&mut self, price: Price, quantity: Quantity) {
        match self.levels.iter_mut().find(|level| level.price() == price) {
            Some(level) => level.add(quantity),
            None => self.levels.push(PriceLevel::new(price, quantity)),
        }
    }

    /// Lowest and highest price, or `None` for an empty book
    pub fn price_range(&self) -> Option<PriceRange> {
        let mut prices = self.levels.iter().map(PriceLevel::price);
        let first = prices.next()?;
        Some(prices.fold(PriceRange::new(first, first), PriceRange::extend))
    }

    #[cfg(test)]
    fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.iter().find(|level| level.price() == price)
    }

    pub fn level_infos(&self) -> Vec<PriceLevelInfo> {
        self.levels.iter().map(PriceLevel::info).collect()
    }

    pub fn total_quantity(&self) -> TotalQuantity {
        self.levels
            .iter()
            .map(|level| TotalQuantity::from(level.quantity()))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
