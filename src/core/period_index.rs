//! Period ↔ column mapping
//!
//! Two layouts are supported:
//! - Fixed columns: a static year → column table (single-grid "Model" sheets)
//! - Header discovery: years read from row 1 of each sheet

use crate::grid::Grid;
use crate::types::{PeriodDomain, Year};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive range of header values accepted as calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBounds {
    pub min: Year,
    pub max: Year,
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: 2000,
            max: 2100,
        }
    }
}

impl YearBounds {
    /// Accept a numeric header if its integer part falls within bounds
    pub fn accept(&self, value: f64) -> Option<Year> {
        if !value.is_finite() {
            return None;
        }
        let year = value.trunc();
        if year >= f64::from(self.min) && year <= f64::from(self.max) {
            Some(year as Year)
        } else {
            None
        }
    }
}

/// Bidirectional year ↔ column mapping
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodIndex {
    /// Static table, e.g. H=2020 … V=2034
    Fixed {
        year_to_col: BTreeMap<Year, u32>,
        col_to_year: BTreeMap<u32, Year>,
    },
    /// Years discovered from a header row, in left-to-right order.
    /// The i-th discovered year reads from column `first_col + i`.
    Header { years: Vec<Year>, first_col: u32 },
}

impl PeriodIndex {
    /// Map the domain onto consecutive columns starting at `first_col`
    pub fn consecutive(domain: &PeriodDomain, first_col: u32) -> Self {
        Self::from_pairs(
            domain
                .years()
                .enumerate()
                .map(|(i, year)| (year, first_col + i as u32)),
        )
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Year, u32)>) -> Self {
        let year_to_col: BTreeMap<Year, u32> = pairs.into_iter().collect();
        let col_to_year = year_to_col.iter().map(|(&y, &c)| (c, y)).collect();
        PeriodIndex::Fixed {
            year_to_col,
            col_to_year,
        }
    }

    /// Read row 1 of `grid`: every cell after column 1 that is numeric and a
    /// plausible year becomes a period; everything else is ignored.
    pub fn discover(grid: &Grid, bounds: YearBounds) -> Self {
        let years = grid
            .row(1)
            .filter(|(col, _)| *col > 1)
            .filter_map(|(_, value)| match value {
                crate::types::CellValue::Number(n) => bounds.accept(*n),
                crate::types::CellValue::Text(_) => None,
            })
            .collect();
        PeriodIndex::Header {
            years,
            first_col: 2,
        }
    }

    pub fn column_of(&self, year: Year) -> Option<u32> {
        match self {
            PeriodIndex::Fixed { year_to_col, .. } => year_to_col.get(&year).copied(),
            PeriodIndex::Header { years, first_col } => years
                .iter()
                .position(|&y| y == year)
                .map(|i| first_col + i as u32),
        }
    }

    pub fn year_of(&self, col: u32) -> Option<Year> {
        match self {
            PeriodIndex::Fixed { col_to_year, .. } => col_to_year.get(&col).copied(),
            PeriodIndex::Header { years, first_col } => col
                .checked_sub(*first_col)
                .and_then(|i| years.get(i as usize))
                .copied(),
        }
    }

    /// Indexed `(year, column)` pairs in column order
    pub fn columns(&self) -> Vec<(Year, u32)> {
        match self {
            PeriodIndex::Fixed { col_to_year, .. } => {
                col_to_year.iter().map(|(&c, &y)| (y, c)).collect()
            }
            PeriodIndex::Header { years, first_col } => years
                .iter()
                .enumerate()
                .map(|(i, &y)| (y, first_col + i as u32))
                .collect(),
        }
    }

    pub fn years(&self) -> Vec<Year> {
        self.columns().into_iter().map(|(y, _)| y).collect()
    }

    pub fn len(&self) -> usize {
        match self {
            PeriodIndex::Fixed { year_to_col, .. } => year_to_col.len(),
            PeriodIndex::Header { years, .. } => years.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
