//! The lookup primitive schedule definitions are built on

use crate::core::period_index::PeriodIndex;
use crate::error::DcfResult;
use crate::grid::Grid;
use crate::types::{PeriodDomain, Series};
use std::fmt;

/// How a definition addresses a line item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldRef {
    /// Text key in the sheet's key column
    Key(String),
    /// Absolute row number (1-indexed)
    Row(u32),
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Key(key) => f.write_str(key),
            FieldRef::Row(row) => write!(f, "row {}", row),
        }
    }
}

impl From<&str> for FieldRef {
    fn from(key: &str) -> Self {
        FieldRef::Key(key.to_string())
    }
}

impl From<u32> for FieldRef {
    fn from(row: u32) -> Self {
        FieldRef::Row(row)
    }
}

/// Resolve `(sheet, field)` references into series
///
/// Implementations are read-only after construction.
pub trait SeriesSource: Send + Sync {
    /// The period domain every resolved series is restricted to
    fn domain(&self) -> &PeriodDomain;

    /// Resolve a reference. Unknown sheets/fields fail with an error listing
    /// the valid alternatives.
    fn resolve(&self, sheet: Option<&str>, field: &FieldRef) -> DcfResult<Series>;

    /// Sheet names this source can resolve against (empty for single-grid sources)
    fn sheet_names(&self) -> Vec<String>;

    /// Field keys available in `sheet`
    fn field_keys(&self, sheet: Option<&str>) -> DcfResult<Vec<String>>;

    /// Short human-readable description of the layout
    fn describe(&self) -> String;
}

impl fmt::Debug for dyn SeriesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesSource")
            .field("layout", &self.describe())
            .finish()
    }
}

/// Read one grid row through a period index.
///
/// Years outside the domain are dropped; cells that cannot be coerced to a
/// number are omitted rather than failing the row.
pub fn read_row(grid: &Grid, row: u32, index: &PeriodIndex, domain: &PeriodDomain) -> Series {
    let mut series = Series::new();
    for (year, col) in index.columns() {
        if !domain.contains(year) {
            continue;
        }
        let Some(cell) = grid.get(row, col) else {
            continue;
        };
        match cell.as_number() {
            Some(value) => series.insert(year, value),
            None => tracing::trace!(row, col, %cell, "omitting non-numeric cell"),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn test_read_row_skips_garbage_and_out_of_domain() {
        let domain = PeriodDomain::from_ranges(2020..=2021, 2022..=2022).unwrap();
        let index = PeriodIndex::from_pairs([(2019, 2), (2020, 3), (2021, 4), (2022, 5)]);
        let grid: Grid = [
            ((7, 2), CellValue::Number(1.0)),
            ((7, 3), CellValue::Number(10.0)),
            ((7, 4), CellValue::Text("#REF!".to_string())),
            ((7, 5), CellValue::Text("12.5".to_string())),
        ]
        .into_iter()
        .collect();

        let series = read_row(&grid, 7, &index, &domain);
        assert_eq!(series.iter().collect::<Vec<_>>(), vec![(2020, 10.0), (2022, 12.5)]);
    }

    #[test]
    fn test_read_missing_row_is_empty() {
        let domain = PeriodDomain::default();
        let index = PeriodIndex::consecutive(&domain, 8);
        assert!(read_row(&Grid::new(), 99, &index, &domain).is_empty());
    }

    #[test]
    fn test_field_ref_display() {
        assert_eq!(FieldRef::from("revenue").to_string(), "revenue");
        assert_eq!(FieldRef::from(42).to_string(), "row 42");
    }
}
