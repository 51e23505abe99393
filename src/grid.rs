//! Sparse cell grid - the read boundary to the spreadsheet codecs
//!
//! Coordinates are 1-indexed `(row, column)` pairs, matching how spreadsheet
//! users address cells ("H5" is row 5, column 8).

use crate::types::CellValue;
use std::collections::BTreeMap;

/// 1-indexed cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    pub row: u32,
    pub col: u32,
}

impl Coordinate {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Sparse map from coordinate to raw value
///
/// Populated once by a loader, then only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: BTreeMap<Coordinate, CellValue>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing whatever was at the coordinate
    pub fn insert(&mut self, row: u32, col: u32, value: CellValue) {
        self.cells.insert(Coordinate::new(row, col), value);
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&Coordinate::new(row, col))
    }

    pub fn get_number(&self, row: u32, col: u32) -> Option<f64> {
        self.get(row, col).and_then(CellValue::as_number)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn max_row(&self) -> u32 {
        self.cells.keys().map(|c| c.row).max().unwrap_or(0)
    }

    pub fn max_col(&self) -> u32 {
        self.cells.keys().map(|c| c.col).max().unwrap_or(0)
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: u32) -> impl Iterator<Item = (u32, &CellValue)> {
        self.cells
            .range(Coordinate::new(row, 0)..=Coordinate::new(row, u32::MAX))
            .map(|(c, v)| (c.col, v))
    }

    /// Distinct populated row numbers, top to bottom
    pub fn row_numbers(&self) -> Vec<u32> {
        let mut rows: Vec<u32> = self.cells.keys().map(|c| c.row).collect();
        rows.dedup();
        rows
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &CellValue)> {
        self.cells.iter().map(|(c, v)| (*c, v))
    }
}

impl FromIterator<((u32, u32), CellValue)> for Grid {
    fn from_iter<I: IntoIterator<Item = ((u32, u32), CellValue)>>(iter: I) -> Self {
        let mut grid = Grid::new();
        for ((row, col), value) in iter {
            grid.insert(row, col, value);
        }
        grid
    }
}
