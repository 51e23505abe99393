//! Workbook / CSV importer - source file → `Grid`

use crate::error::{DcfError, DcfResult};
use crate::grid::Grid;
use crate::types::CellValue;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};

/// Input file shapes, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Single grid, fixed-column layout
    Csv,
    /// Spreadsheet workbook (one or many sheets)
    Workbook,
    /// YAML model summary
    Snapshot,
}

impl InputKind {
    pub fn detect(path: &Path) -> DcfResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(InputKind::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputKind::Workbook),
            "yaml" | "yml" => Ok(InputKind::Snapshot),
            _ => Err(DcfError::UnsupportedInput {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Reads grids out of CSV files and spreadsheet workbooks
pub struct WorkbookImporter {
    path: PathBuf,
    kind: InputKind,
}

impl WorkbookImporter {
    /// Create an importer, rejecting unsupported file types up front
    pub fn new<P: AsRef<Path>>(path: P) -> DcfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let kind = InputKind::detect(&path)?;
        if kind == InputKind::Snapshot {
            return Err(DcfError::UnsupportedInput {
                path: path.display().to_string(),
                extension: "yaml (snapshots are not cell grids)".to_string(),
            });
        }
        if !path.exists() {
            return Err(DcfError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input file not found: {}", path.display()),
            )));
        }
        Ok(Self { path, kind })
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Load a single grid. For CSV input the sheet name is ignored.
    pub fn load_grid(&self, sheet: &str) -> DcfResult<Grid> {
        let grid = match self.kind {
            InputKind::Csv => self.load_csv()?,
            _ => {
                let mut workbook = open_workbook_auto(&self.path)
                    .map_err(|e| DcfError::Workbook(format!("Failed to open workbook: {}", e)))?;
                let available = workbook.sheet_names().to_vec();
                if !available.iter().any(|s| s == sheet) {
                    return Err(DcfError::SheetNotFound {
                        sheet: sheet.to_string(),
                        available,
                    });
                }
                let range = workbook.worksheet_range(sheet).map_err(|e| {
                    DcfError::Workbook(format!("Failed to read sheet '{}': {}", sheet, e))
                })?;
                range_to_grid(&range)
            }
        };

        if grid.is_empty() {
            return Err(DcfError::EmptyInput(self.path.display().to_string()));
        }
        tracing::info!(path = %self.path.display(), cells = grid.len(), "loaded grid");
        Ok(grid)
    }

    /// Load every sheet in workbook order. CSV input yields one sheet named
    /// after the file stem.
    pub fn load_sheets(&self) -> DcfResult<Vec<(String, Grid)>> {
        let sheets = match self.kind {
            InputKind::Csv => {
                let name = self
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Sheet1")
                    .to_string();
                vec![(name, self.load_csv()?)]
            }
            _ => {
                let mut workbook = open_workbook_auto(&self.path)
                    .map_err(|e| DcfError::Workbook(format!("Failed to open workbook: {}", e)))?;
                let names = workbook.sheet_names().to_vec();
                let mut sheets = Vec::with_capacity(names.len());
                for name in names {
                    let range = workbook.worksheet_range(&name).map_err(|e| {
                        DcfError::Workbook(format!("Failed to read sheet '{}': {}", name, e))
                    })?;
                    sheets.push((name, range_to_grid(&range)));
                }
                sheets
            }
        };

        if sheets.iter().all(|(_, grid)| grid.is_empty()) {
            return Err(DcfError::EmptyInput(self.path.display().to_string()));
        }
        tracing::info!(path = %self.path.display(), sheets = sheets.len(), "loaded workbook");
        Ok(sheets)
    }

    fn load_csv(&self) -> DcfResult<Grid> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            // Rows in a model export have ragged widths
            .flexible(true)
            .from_path(&self.path)?;

        let mut grid = Grid::new();
        for (r_idx, record) in reader.records().enumerate() {
            let record = record?;
            for (c_idx, field) in record.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                let value = match field.trim().parse::<f64>() {
                    Ok(n) => CellValue::Number(n),
                    Err(_) => CellValue::Text(field.to_string()),
                };
                grid.insert(r_idx as u32 + 1, c_idx as u32 + 1, value);
            }
        }
        Ok(grid)
    }
}

/// Copy a calamine range into a grid, keeping absolute 1-indexed positions
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut grid = Grid::new();
    for (row, col, data) in range.used_cells() {
        if let Some(value) = convert_cell(data) {
            grid.insert(row0 + row as u32 + 1, col0 + col as u32 + 1, value);
        }
    }
    grid
}

fn convert_cell(data: &Data) -> Option<CellValue> {
    match data {
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Bool(b) => Some(CellValue::Number(if *b { 1.0 } else { 0.0 })),
        Data::String(s) if !s.is_empty() => Some(CellValue::Text(s.clone())),
        Data::DateTime(dt) => Some(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        _ => None,
    }
}
