//! Schedule definitions and the model built from them

pub mod definition;
pub mod model;
pub mod snapshot;

pub use definition::{FieldDef, FieldKind, PeriodsConfig, ScheduleBook, ScheduleDef, SourceConfig};
pub use model::{open_source, Model, SourceLayout};
pub use snapshot::read_snapshot;
