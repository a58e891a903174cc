use crate::store::types::{Price, PriceLevelInfo, Quantity};

/// Aggregated quantity at one price of one symbol.
///
/// A level is only ever reached through the book that owns it, and the book
/// only through its shard lock, so the quantity is a plain counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    price: Price,
    quantity: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        Self { price, quantity }
    }

    /// Add a contribution to this level.
    ///
    /// Panics if the total would exceed `Quantity::MAX`.
    pub fn add(&mut self, quantity: Quantity) {
        self.quantity = match self.quantity.checked_add(quantity) {
            Some(total) => total,
            None => panic!(
                "quantity overflow at price {}: {} + {}",
                self.price, self.quantity, quantity
            ),
        };
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn info(&self) -> PriceLevelInfo {
        PriceLevelInfo {
            price: self.price,
            quantity: self.quantity,
        }
    }
}
