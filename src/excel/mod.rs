//! Spreadsheet I/O
//!
//! - Import: CSV / workbook sheets → `Grid`
//! - Render: schedules → positioned, styled report cells
//! - Export: rendered report → formatted .xlsx

pub mod exporter;
pub mod importer;
pub mod layout;
pub mod render;

pub use exporter::ExcelExporter;
pub use importer::{InputKind, WorkbookImporter};
pub use layout::LayoutConfig;
pub use render::{
    BlockPlan, CellContent, CellStyle, RenderedBlock, RenderedReport, ReportCell, ReportRenderer,
    PREAMBLE_ROWS,
};
