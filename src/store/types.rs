use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Symbol = String;
pub type Price = i64; // Any integer price, including zero and negatives
pub type Quantity = u64;
/// Sum over many levels; each level alone may reach `Quantity::MAX`
pub type TotalQuantity = u128;

/// Lowest and highest price recorded for a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Price,
}

impl PriceRange {
    pub fn new(min: Price, max: Price) -> Self {
        Self { min, max }
    }

    /// Widen the range so that it covers `price`
    pub fn extend(self, price: Price) -> Self {
        Self {
            min: self.min.min(price),
            max: self.max.max(price),
        }
    }
}

impl From<PriceRange> for (Price, Price) {
    fn from(range: PriceRange) -> Self {
        (range.min, range.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevelInfo {
    pub price: Price,
    pub quantity: Quantity,
}

/// All levels of one symbol, copied out under that symbol's lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub symbol: Symbol,
    pub levels: Vec<PriceLevelInfo>,
}

impl SymbolSnapshot {
    pub fn total_quantity(&self) -> TotalQuantity {
        self.levels
            .iter()
            .map(|level| TotalQuantity::from(level.quantity))
            .sum()
    }

    /// Quantity aggregated at `price`, if a level exists there
    pub fn quantity_at(&self, price: Price) -> Option<Quantity> {
        self.levels
            .iter()
            .find(|level| level.price == price)
            .map(|level| level.quantity)
    }
}

impl fmt::Display for SymbolSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.symbol)?;
        for level in &self.levels {
            write!(f, " {{price: {}, quantity: {}}}", level.price, level.quantity)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub timestamp: DateTime<Utc>,
    pub symbols: Vec<SymbolSnapshot>,
}

impl StoreSnapshot {
    pub fn get(&self, symbol: &str) -> Option<&SymbolSnapshot> {
        self.symbols.iter().find(|entry| entry.symbol == symbol)
    }
}

impl fmt::Display for StoreSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.symbols {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_range_extend() {
        let range = PriceRange::new(2, 2).extend(5).extend(-3);
        assert_eq!(range, PriceRange::new(-3, 5));
        assert_eq!(<(Price, Price)>::from(range), (-3, 5));
    }

    #[test]
    fn test_symbol_snapshot_display() {
        let entry = SymbolSnapshot {
            symbol: "TCS".to_string(),
            levels: vec![
                PriceLevelInfo {
                    price: 2,
                    quantity: 30,
                },
                PriceLevelInfo {
                    price: 1,
                    quantity: 5,
                },
            ],
        };

        assert_eq!(
            entry.to_string(),
            "TCS: {price: 2, quantity: 30} {price: 1, quantity: 5}"
        );
        assert_eq!(entry.total_quantity(), 35);
        assert_eq!(entry.quantity_at(1), Some(5));
        assert_eq!(entry.quantity_at(7), None);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = StoreSnapshot {
            timestamp: Utc::now(),
            symbols: vec![SymbolSnapshot {
                symbol: "INFY".to_string(),
                levels: vec![PriceLevelInfo {
                    price: 0,
                    quantity: 10,
                }],
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: StoreSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.symbols, snapshot.symbols);
        assert_eq!(restored.get("INFY").unwrap().quantity_at(0), Some(10));
    }

    #[test]
    fn test_total_quantity_past_u64() {
        let entry = SymbolSnapshot {
            symbol: "BIG".to_string(),
            levels: vec![
                PriceLevelInfo {
                    price: 1,
                    quantity: Quantity::MAX,
                },
                PriceLevelInfo {
                    price: 2,
                    quantity: 1,
                },
            ],
        };

        assert_eq!(entry.total_quantity(), TotalQuantity::from(Quantity::MAX) + 1);
    }
}
