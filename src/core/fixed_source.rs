//! Single-grid source with a static year → column table

use crate::core::period_index::PeriodIndex;
use crate::core::series_source::{read_row, FieldRef, SeriesSource};
use crate::error::{DcfError, DcfResult};
use crate::grid::Grid;
use crate::types::{PeriodDomain, Series, Year};

/// Fixed-column layout: specific rows carry specific concepts, and every
/// period lives in a known column.
#[derive(Debug, Clone)]
pub struct FixedColumnSource {
    grid: Grid,
    index: PeriodIndex,
    domain: PeriodDomain,
    /// Column holding text keys, when rows are also addressable by name
    key_column: Option<u32>,
}

impl FixedColumnSource {
    pub fn new(grid: Grid, domain: PeriodDomain, first_period_col: u32) -> Self {
        let index = PeriodIndex::consecutive(&domain, first_period_col);
        Self::with_index(grid, domain, index)
    }

    pub fn with_index(grid: Grid, domain: PeriodDomain, index: PeriodIndex) -> Self {
        Self {
            grid,
            index,
            domain,
            key_column: None,
        }
    }

    /// Allow `FieldRef::Key` lookups against the text in `col`
    pub fn with_key_column(mut self, col: u32) -> Self {
        self.key_column = Some(col);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn index(&self) -> &PeriodIndex {
        &self.index
    }

    /// Raw cell lookup by year; `None` when the year has no column
    pub fn get_by_year(&self, row: u32, year: Year) -> Option<f64> {
        let col = self.index.column_of(year)?;
        self.grid.get_number(row, col)
    }

    /// `{year: value}` for a row across the given years (default: all)
    pub fn row_series(&self, row: u32, years: Option<&[Year]>) -> Series {
        let all = read_row(&self.grid, row, &self.index, &self.domain);
        match years {
            Some(years) => all.iter().filter(|(y, _)| years.contains(y)).collect(),
            None => all,
        }
    }

    pub fn historical(&self, row: u32) -> Series {
        self.row_series(row, Some(self.domain.historical()))
    }

    pub fn projected(&self, row: u32) -> Series {
        self.row_series(row, Some(self.domain.projected()))
    }

    fn keyed_rows(&self) -> Vec<(String, u32)> {
        let Some(key_col) = self.key_column else {
            return Vec::new();
        };
        self.grid
            .iter()
            .filter(|(c, _)| c.col == key_col)
            .map(|(c, v)| (v.to_string().trim().to_string(), c.row))
            .filter(|(k, _)| !k.is_empty())
            .collect()
    }

    /// Distinct keys in first-seen order
    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for (key, _) in self.keyed_rows() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Row of `key`; a repeated key resolves to its last row
    fn row_for_key(&self, key: &str) -> DcfResult<u32> {
        self.keyed_rows()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, row)| *row)
            .ok_or_else(|| DcfError::FieldNotFound {
                field: key.to_string(),
                scope: match self.key_column {
                    Some(col) => format!("key column {}", col),
                    None => "fixed-column grid (no key column configured)".to_string(),
                },
                available: self.keys(),
            })
    }
}

impl SeriesSource for FixedColumnSource {
    fn domain(&self) -> &PeriodDomain {
        &self.domain
    }

    /// The sheet part of the reference is ignored: there is only one grid.
    fn resolve(&self, _sheet: Option<&str>, field: &FieldRef) -> DcfResult<Series> {
        let row = match field {
            FieldRef::Row(row) => *row,
            FieldRef::Key(key) => self.row_for_key(key)?,
        };
        Ok(read_row(&self.grid, row, &self.index, &self.domain))
    }

    fn sheet_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn field_keys(&self, _sheet: Option<&str>) -> DcfResult<Vec<String>> {
        Ok(self.keys())
    }

    fn describe(&self) -> String {
        format!(
            "fixed-column grid ({} cells, {} period columns)",
            self.grid.len(),
            self.index.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn model_grid() -> Grid {
        let mut grid = Grid::new();
        grid.insert(10, 3, CellValue::Text("Revenue".to_string()));
        for (i, value) in [100.0, 110.0, 121.0, 133.1, 146.41, 161.05].iter().enumerate() {
            grid.insert(10, 8 + i as u32, CellValue::Number(*value));
        }
        grid.insert(11, 3, CellValue::Text("  EBITDA margin ".to_string()));
        grid.insert(11, 8, CellValue::Text("n/m".to_string()));
        grid.insert(11, 9, CellValue::Number(0.31));
        grid
    }

    #[test]
    fn test_resolve_by_row() {
        let source = FixedColumnSource::new(model_grid(), PeriodDomain::default(), 8);
        let series = source.resolve(None, &FieldRef::Row(10)).unwrap();
        assert_eq!(series.len(), 6);
        assert_eq!(series.get(2020), Some(100.0));
        assert_eq!(series.get(2025), Some(161.05));
        assert_eq!(series.get(2026), None);
    }

    #[test]
    fn test_historical_and_projected_split() {
        let source = FixedColumnSource::new(model_grid(), PeriodDomain::default(), 8);
        assert_eq!(source.historical(10).len(), 5);
        assert_eq!(source.projected(10).years().collect::<Vec<_>>(), vec![2025]);
        assert_eq!(source.get_by_year(10, 2021), Some(110.0));
        assert_eq!(source.get_by_year(10, 2040), None);
    }

    #[test]
    fn test_resolve_by_key_column() {
        let source =
            FixedColumnSource::new(model_grid(), PeriodDomain::default(), 8).with_key_column(3);
        let margin = source.resolve(None, &FieldRef::from("EBITDA margin")).unwrap();
        assert_eq!(margin.iter().collect::<Vec<_>>(), vec![(2021, 0.31)]);
    }

    #[test]
    fn test_unknown_key_lists_available() {
        let source =
            FixedColumnSource::new(model_grid(), PeriodDomain::default(), 8).with_key_column(3);
        let err = source.resolve(None, &FieldRef::from("Capex")).unwrap_err();
        assert_eq!(
            err.alternatives().unwrap(),
            &["Revenue".to_string(), "EBITDA margin".to_string()]
        );
    }

    #[test]
    fn test_repeated_key_resolves_to_last_row() {
        let mut grid = model_grid();
        grid.insert(12, 3, CellValue::Text("Revenue".to_string()));
        grid.insert(12, 8, CellValue::Number(999.0));
        let source = FixedColumnSource::new(grid, PeriodDomain::default(), 8).with_key_column(3);

        let revenue = source.resolve(None, &FieldRef::from("Revenue")).unwrap();
        assert_eq!(revenue.iter().collect::<Vec<_>>(), vec![(2020, 999.0)]);
        assert_eq!(
            source.field_keys(None).unwrap(),
            vec!["Revenue".to_string(), "EBITDA margin".to_string()]
        );
    }
}
