use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreError {
    /// No book exists for the symbol
    SymbolNotFound(String),
}

impl StoreError {
    pub fn symbol_not_found(symbol: &str) -> Self {
        StoreError::SymbolNotFound(symbol.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::SymbolNotFound(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::SymbolNotFound(symbol) => write!(f, "Symbol not found: {}", symbol),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            StoreError::symbol_not_found("HDFCBANK").to_string(),
            "Symbol not found: HDFCBANK"
        );
        assert!(StoreError::symbol_not_found("X").is_not_found());
    }

    #[test]
    fn test_error_serialization() {
        let error = StoreError::symbol_not_found("SBIN");
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: StoreError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
