//! DCF Forge - financial schedule extraction and report rendering
//!
//! Reads positional spreadsheet data (a fixed-column CSV/worksheet or one sheet
//! per schedule), resolves it into hierarchical schedules of year-indexed
//! series, and renders every schedule onto one formatted worksheet.
//!
//! # Features
//!
//! - Two source layouts behind one `SeriesSource` trait
//! - Declarative schedule definitions (YAML, JSON Schema validated)
//! - Single-sheet .xlsx report with per-row number formats
//! - YAML model snapshots
//!
//! # Example
//!
//! ```no_run
//! use dcf_forge::excel::{ExcelExporter, LayoutConfig};
//! use dcf_forge::schedule::{Model, ScheduleBook, SourceLayout};
//! use std::path::Path;
//!
//! let book = ScheduleBook::bundled()?;
//! let model = Model::load(Path::new("ypf.xlsx"), SourceLayout::Auto, &book)?;
//!
//! println!("Schedules: {}", model.schedules().len());
//!
//! let exporter = ExcelExporter::new(LayoutConfig::default());
//! exporter.export(&model, Path::new("report.xlsx"))?;
//! # Ok::<(), dcf_forge::error::DcfError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod grid;
pub mod schedule;
pub mod types;

// Re-export commonly used types
pub use error::{DcfError, DcfResult};
pub use grid::Grid;
pub use schedule::{Model, ScheduleBook};
pub use types::{Node, PeriodDomain, PeriodKind, Schedule, Section, Series, Year};
