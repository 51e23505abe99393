//! Display-format inference for data rows

use crate::types::Series;
use serde::{Deserialize, Serialize};

/// Labels containing any of these are ratios
pub const PERCENT_KEYWORDS: &[&str] = &["margin", "growth", "yield", "roe", "return on", "rate"];

/// Labels containing any of these are per-unit prices
pub const DECIMAL_KEYWORDS: &[&str] = &["pricing", "price", "$/", "per boe", "per bbl"];

/// Series whose every value lies within ±this bound are treated as ratios
pub const PERCENT_MAGNITUDE_BOUND: f64 = 2.5;

/// Number format class of a data row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatClass {
    Integer,
    Decimal,
    Percent,
}

/// Classify a row by label keywords first, then by value magnitude.
///
/// Rules, first match wins:
/// 1. label mentions a ratio keyword → `Percent`
/// 2. at least one value, all within ±2.5 → `Percent`
/// 3. label mentions a price keyword → `Decimal`
/// 4. `Integer`
pub fn classify(label: &str, series: &Series) -> FormatClass {
    let lower = label.to_lowercase();
    if PERCENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return FormatClass::Percent;
    }

    let mut values = series.values().peekable();
    if values.peek().is_some()
        && values.all(|v| (-PERCENT_MAGNITUDE_BOUND..=PERCENT_MAGNITUDE_BOUND).contains(&v))
    {
        return FormatClass::Percent;
    }

    if DECIMAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return FormatClass::Decimal;
    }

    FormatClass::Integer
}
