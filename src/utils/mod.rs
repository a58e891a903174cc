pub mod time;

use crate::store::PriceRange;

/// Split a comma-separated symbol list, dropping blanks
pub fn parse_symbols(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string)
        .collect()
}

/// Render a `(min, max)` price range for console output
pub fn format_range(range: &PriceRange) -> String {
    format!("{{{}, {}}}", range.min, range.max)
}
