//! Extraction and flattening engine: period indexing, series lookup,
//! tree linearization and row format inference

pub mod fixed_source;
pub mod flattener;
pub mod format_classifier;
pub mod period_index;
pub mod series_source;
pub mod sheet_source;

pub use fixed_source::FixedColumnSource;
pub use flattener::{flatten, humanize_key, FlatRecord};
pub use format_classifier::{classify, FormatClass};
pub use period_index::{PeriodIndex, YearBounds};
pub use series_source::{FieldRef, SeriesSource};
pub use sheet_source::{SheetSource, SheetTable};
