//! The loaded model: source + every schedule built from it

use crate::core::fixed_source::FixedColumnSource;
use crate::core::series_source::{FieldRef, SeriesSource};
use crate::core::sheet_source::SheetSource;
use crate::error::{DcfError, DcfResult};
use crate::excel::importer::{InputKind, WorkbookImporter};
use crate::schedule::definition::{PeriodsConfig, ScheduleBook};
use crate::schedule::snapshot;
use crate::types::{Node, PeriodDomain, Schedule, Section, Series};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which source strategy to build for an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceLayout {
    /// CSV → fixed columns, workbook → one sheet per schedule
    #[default]
    Auto,
    /// Single grid with a static year → column table
    Fixed,
    /// One sheet per schedule with a year header row
    Sheets,
}

impl FromStr for SourceLayout {
    type Err = DcfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(SourceLayout::Auto),
            "fixed" => Ok(SourceLayout::Fixed),
            "sheets" => Ok(SourceLayout::Sheets),
            other => Err(DcfError::Definition(format!(
                "unknown layout '{}' (expected auto, fixed or sheets)",
                other
            ))),
        }
    }
}

/// Build the series source for `path` according to `layout`
pub fn open_source(
    path: &Path,
    layout: SourceLayout,
    book: &ScheduleBook,
) -> DcfResult<Box<dyn SeriesSource>> {
    let importer = WorkbookImporter::new(path)?;
    let domain = book.domain()?;
    let layout = match (layout, importer.kind()) {
        (SourceLayout::Auto, InputKind::Csv) => SourceLayout::Fixed,
        (SourceLayout::Auto, _) => SourceLayout::Sheets,
        (explicit, _) => explicit,
    };

    match layout {
        SourceLayout::Fixed => {
            let grid = importer.load_grid(&book.source.model_sheet)?;
            let mut source =
                FixedColumnSource::new(grid, domain, book.source.first_period_column);
            if let Some(col) = book.source.key_column {
                source = source.with_key_column(col);
            }
            Ok(Box::new(source))
        }
        _ => {
            let sheets = importer.load_sheets()?;
            Ok(Box::new(SheetSource::from_grids(
                sheets,
                domain,
                book.source.year_bounds,
            )))
        }
    }
}

/// Ordered collection of schedules, read-only once built
pub struct Model {
    domain: PeriodDomain,
    company: Option<String>,
    schedules: Vec<Schedule>,
    source: Option<Box<dyn SeriesSource>>,
}

impl Model {
    /// Resolve every schedule in `book` against `source`, in book order
    pub fn build(source: Box<dyn SeriesSource>, book: &ScheduleBook) -> DcfResult<Self> {
        let schedules = book
            .schedules
            .iter()
            .map(|def| def.build(source.as_ref()))
            .collect::<DcfResult<Vec<_>>>()?;

        tracing::info!(
            source = %source.describe(),
            schedules = schedules.len(),
            "model built"
        );

        Ok(Self {
            domain: source.domain().clone(),
            company: book.company.clone(),
            schedules,
            source: Some(source),
        })
    }

    /// A model with no backing source (tests, snapshots)
    pub fn from_schedules(domain: PeriodDomain, schedules: Vec<Schedule>) -> Self {
        Self {
            domain,
            company: None,
            schedules,
            source: None,
        }
    }

    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = company;
        self
    }

    /// Load a workbook, CSV or YAML snapshot
    pub fn load(path: &Path, layout: SourceLayout, book: &ScheduleBook) -> DcfResult<Self> {
        if InputKind::detect(path)? == InputKind::Snapshot {
            let content = std::fs::read_to_string(path)?;
            return snapshot::read_snapshot(&content);
        }
        let source = open_source(path, layout, book)?;
        Self::build(source, book)
    }

    pub fn domain(&self) -> &PeriodDomain {
        &self.domain
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn schedule(&self, name: &str) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.name == name)
    }

    pub fn source(&self) -> Option<&dyn SeriesSource> {
        self.source.as_deref()
    }

    /// Look a reference up directly in the backing source
    pub fn resolve(&self, sheet: Option<&str>, field: &FieldRef) -> DcfResult<Series> {
        match &self.source {
            Some(source) => source.resolve(sheet, field),
            None => Err(DcfError::FieldNotFound {
                field: field.to_string(),
                scope: "a model without a backing source".to_string(),
                available: Vec::new(),
            }),
        }
    }

    /// The whole model as nested YAML: schedule → section → … → {year: value}
    pub fn summary(&self) -> Value {
        let mut schedules = Mapping::new();
        for schedule in &self.schedules {
            schedules.insert(
                Value::String(schedule.name.clone()),
                section_to_value(&schedule.root),
            );
        }

        let periods = PeriodsConfig::from(&self.domain);
        let mut root = Mapping::new();
        if let Some(company) = &self.company {
            root.insert(Value::from("company"), Value::String(company.clone()));
        }
        root.insert(
            Value::from("periods"),
            serde_yaml::to_value(periods).unwrap_or(Value::Null),
        );
        root.insert(Value::from("schedules"), Value::Mapping(schedules));
        Value::Mapping(root)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("company", &self.company)
            .field("periods", &self.domain.len())
            .field("schedules", &self.schedules.len())
            .finish()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Model: {} schedules loaded>", self.schedules.len())
    }
}

fn section_to_value(section: &Section) -> Value {
    let mut map = Mapping::new();
    for (key, node) in section.iter() {
        let value = match node {
            Node::Section(child) => section_to_value(child),
            Node::Leaf(series) => {
                let mut values = Mapping::new();
                for (year, value) in series.iter() {
                    values.insert(Value::from(year), Value::from(value));
                }
                Value::Mapping(values)
            }
        };
        map.insert(Value::String(key.to_string()), value);
    }
    Value::Mapping(map)
}
