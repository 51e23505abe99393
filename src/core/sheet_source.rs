//! Multi-sheet source: one worksheet per schedule
//!
//! Sheet format:
//! ```text
//! Row 1:  [ignored] | 2020 | 2021 | ... | 2034   (year header)
//! Row 2+: field_key | val  | val  | ... | val
//! ```

use crate::core::period_index::{PeriodIndex, YearBounds};
use crate::core::series_source::{read_row, FieldRef, SeriesSource};
use crate::error::{DcfError, DcfResult};
use crate::grid::Grid;
use crate::types::{PeriodDomain, Series};
use std::collections::HashMap;

/// One parsed worksheet: its grid, discovered periods and key → row table
#[derive(Debug, Clone)]
pub struct SheetTable {
    name: String,
    grid: Grid,
    index: PeriodIndex,
    /// Keys in first-seen order
    keys: Vec<String>,
    /// Key → row; a repeated key resolves to its last row
    rows: HashMap<String, u32>,
}

impl SheetTable {
    pub fn parse(name: impl Into<String>, grid: Grid, bounds: YearBounds) -> Self {
        let name = name.into();
        let index = PeriodIndex::discover(&grid, bounds);

        let mut keys = Vec::new();
        let mut rows = HashMap::new();
        for row in grid.row_numbers().into_iter().filter(|&r| r > 1) {
            let Some(cell) = grid.get(row, 1) else {
                continue;
            };
            let key = cell.to_string().trim().to_string();
            if key.is_empty() {
                continue;
            }
            if rows.insert(key.clone(), row).is_none() {
                keys.push(key);
            }
        }

        tracing::debug!(
            sheet = %name,
            periods = index.len(),
            fields = keys.len(),
            "parsed sheet"
        );

        Self {
            name,
            grid,
            index,
            keys,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &PeriodIndex {
        &self.index
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn row_for(&self, key: &str) -> DcfResult<u32> {
        self.rows
            .get(key)
            .copied()
            .ok_or_else(|| DcfError::FieldNotFound {
                field: key.to_string(),
                scope: format!("sheet '{}'", self.name),
                available: self.keys.clone(),
            })
    }
}

/// Per-sheet header layout
#[derive(Debug, Clone)]
pub struct SheetSource {
    sheets: Vec<SheetTable>,
    domain: PeriodDomain,
}

impl SheetSource {
    pub fn new(sheets: Vec<SheetTable>, domain: PeriodDomain) -> Self {
        Self { sheets, domain }
    }

    /// Parse named grids with the given year bounds
    pub fn from_grids(
        grids: impl IntoIterator<Item = (String, Grid)>,
        domain: PeriodDomain,
        bounds: YearBounds,
    ) -> Self {
        let sheets = grids
            .into_iter()
            .map(|(name, grid)| SheetTable::parse(name, grid, bounds))
            .collect();
        Self::new(sheets, domain)
    }

    pub fn sheets(&self) -> &[SheetTable] {
        &self.sheets
    }

    pub fn sheet(&self, name: Option<&str>) -> DcfResult<&SheetTable> {
        let found = name.and_then(|n| self.sheets.iter().find(|s| s.name == n));
        found.ok_or_else(|| DcfError::SheetNotFound {
            sheet: name.unwrap_or("<none>").to_string(),
            available: self.sheet_names(),
        })
    }
}

impl SeriesSource for SheetSource {
    fn domain(&self) -> &PeriodDomain {
        &self.domain
    }

    fn resolve(&self, sheet: Option<&str>, field: &FieldRef) -> DcfResult<Series> {
        let table = self.sheet(sheet)?;
        let row = match field {
            FieldRef::Key(key) => table.row_for(key)?,
            FieldRef::Row(row) => *row,
        };
        Ok(read_row(&table.grid, row, &table.index, &self.domain))
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn field_keys(&self, sheet: Option<&str>) -> DcfResult<Vec<String>> {
        Ok(self.sheet(sheet)?.keys.clone())
    }

    fn describe(&self) -> String {
        format!("per-sheet workbook ({} sheets)", self.sheets.len())
    }
}
