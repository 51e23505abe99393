//! Declarative schedule definitions (YAML)
//!
//! ```yaml
//! company: "Yacimientos Petrolíferos Fiscales S.A."
//! periods:
//!   historical: [2020, 2021, 2022, 2023, 2024]
//!   projected: [2025, 2026, 2027]
//! schedules:
//!   - name: Income Statement
//!     sheet: Income Statement        # defaults to the name
//!     fields:
//!       - key: line_items
//!         children:
//!           - { key: revenue, field: revenue }
//!           - { key: ebitda, row: 42 }
//! ```
//!
//! Every field node carries exactly one of `field`, `row` or `children`.

use crate::core::period_index::YearBounds;
use crate::core::series_source::{FieldRef, SeriesSource};
use crate::error::{DcfError, DcfResult};
use crate::types::{Node, PeriodDomain, RowRange, Schedule, Section, Year};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUNDLED_BOOK: &str = include_str!("../../definitions/ypf.yaml");
const BOOK_SCHEMA: &str = include_str!("../../schema/definitions.schema.json");

/// Period domain as written in config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodsConfig {
    pub historical: Vec<Year>,
    pub projected: Vec<Year>,
}

impl Default for PeriodsConfig {
    fn default() -> Self {
        let domain = PeriodDomain::default();
        Self::from(&domain)
    }
}

impl From<&PeriodDomain> for PeriodsConfig {
    fn from(domain: &PeriodDomain) -> Self {
        Self {
            historical: domain.historical().to_vec(),
            projected: domain.projected().to_vec(),
        }
    }
}

impl PeriodsConfig {
    pub fn domain(&self) -> DcfResult<PeriodDomain> {
        PeriodDomain::new(self.historical.clone(), self.projected.clone())
    }
}

/// Where the source data sits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Worksheet read in the fixed-column layout
    pub model_sheet: String,
    /// Column of the first period in the fixed-column layout (1-indexed)
    pub first_period_column: u32,
    /// Column with row keys in the fixed-column layout, if any
    pub key_column: Option<u32>,
    /// Header values accepted as years in the per-sheet layout
    pub year_bounds: YearBounds,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            model_sheet: "Model".to_string(),
            first_period_column: 8,
            key_column: None,
            year_bounds: YearBounds::default(),
        }
    }
}

/// A complete set of schedule definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBook {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub periods: PeriodsConfig,
    #[serde(default)]
    pub source: SourceConfig,
    pub schedules: Vec<ScheduleDef>,
}

/// One schedule: metadata plus its field tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<RowRange>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// A field node: leaf reference or named group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FieldDef>>,
}

/// What a field node resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind<'a> {
    Leaf(FieldRef),
    Group(&'a [FieldDef]),
}

impl FieldDef {
    pub fn leaf(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field: Some(field.into()),
            row: None,
            children: None,
        }
    }

    pub fn row(key: impl Into<String>, row: u32) -> Self {
        Self {
            key: key.into(),
            field: None,
            row: Some(row),
            children: None,
        }
    }

    pub fn group(key: impl Into<String>, children: Vec<FieldDef>) -> Self {
        Self {
            key: key.into(),
            field: None,
            row: None,
            children: Some(children),
        }
    }

    /// Classify the node; anything other than exactly one of
    /// `field`/`row`/`children` is a malformed definition.
    pub fn kind(&self) -> DcfResult<FieldKind<'_>> {
        match (&self.field, self.row, &self.children) {
            (Some(key), None, None) => Ok(FieldKind::Leaf(FieldRef::Key(key.clone()))),
            (None, Some(row), None) => Ok(FieldKind::Leaf(FieldRef::Row(row))),
            (None, None, Some(children)) => Ok(FieldKind::Group(children)),
            _ => Err(DcfError::Definition(format!(
                "field '{}' must have exactly one of 'field', 'row' or 'children'",
                self.key
            ))),
        }
    }
}

impl ScheduleDef {
    /// Sheet the schedule reads from (its own name unless overridden)
    pub fn sheet_name(&self) -> &str {
        self.sheet.as_deref().unwrap_or(&self.name)
    }

    /// Resolve every field through `source` and assemble the section tree
    pub fn build(&self, source: &dyn SeriesSource) -> DcfResult<Schedule> {
        let root = self.build_section(&self.fields, source, &self.name)?;
        Ok(Schedule {
            name: self.name.clone(),
            sheet: Some(self.sheet_name().to_string()),
            rows: self.rows,
            root,
        })
    }

    fn build_section(
        &self,
        fields: &[FieldDef],
        source: &dyn SeriesSource,
        path: &str,
    ) -> DcfResult<Section> {
        let mut seen = HashSet::new();
        let mut section = Section::new();
        for def in fields {
            if !seen.insert(def.key.as_str()) {
                return Err(DcfError::Definition(format!(
                    "duplicate key '{}' in '{}'",
                    def.key, path
                )));
            }
            let node = match def.kind()? {
                FieldKind::Leaf(field) => {
                    Node::Leaf(source.resolve(Some(self.sheet_name()), &field)?)
                }
                FieldKind::Group(children) => {
                    let child_path = format!("{}.{}", path, def.key);
                    Node::Section(self.build_section(children, source, &child_path)?)
                }
            };
            section.push(def.key.clone(), node);
        }
        Ok(section)
    }

    /// Number of leaf references in the definition
    pub fn field_count(&self) -> usize {
        fn count(fields: &[FieldDef]) -> usize {
            fields
                .iter()
                .map(|f| match &f.children {
                    Some(children) => count(children),
                    None => 1,
                })
                .sum()
        }
        count(&self.fields)
    }
}

impl ScheduleBook {
    /// The 14 YPF schedules shipped with the crate
    pub fn bundled() -> DcfResult<Self> {
        Self::from_yaml_str(BUNDLED_BOOK)
    }

    pub fn from_file(path: &Path) -> DcfResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse, validate against the embedded schema, then check names are unique
    pub fn from_yaml_str(content: &str) -> DcfResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        validate_against_schema(&yaml)?;
        let book: ScheduleBook = serde_yaml::from_value(yaml)?;

        let mut names = HashSet::new();
        for schedule in &book.schedules {
            if !names.insert(schedule.name.as_str()) {
                return Err(DcfError::Definition(format!(
                    "duplicate schedule name '{}'",
                    schedule.name
                )));
            }
        }
        book.periods.domain()?;
        Ok(book)
    }

    pub fn domain(&self) -> DcfResult<PeriodDomain> {
        self.periods.domain()
    }

    pub fn schedule(&self, name: &str) -> Option<&ScheduleDef> {
        self.schedules.iter().find(|s| s.name == name)
    }
}

fn validate_against_schema(yaml: &serde_yaml::Value) -> DcfResult<()> {
    let schema_value: serde_json::Value = serde_json::from_str(BOOK_SCHEMA)
        .map_err(|e| DcfError::Validation(format!("Failed to parse schema: {}", e)))?;

    let compiled_schema = JSONSchema::compile(&schema_value)
        .map_err(|e| DcfError::Validation(format!("Failed to compile schema: {}", e)))?;

    let json_value: serde_json::Value = serde_json::to_value(yaml)
        .map_err(|e| DcfError::Validation(format!("Failed to convert YAML to JSON: {}", e)))?;

    if let Err(errors) = compiled_schema.validate(&json_value) {
        let error_messages: Vec<String> = errors.map(|e| format!("  - {}", e)).collect();
        return Err(DcfError::Validation(format!(
            "Schema validation failed:\n{}",
            error_messages.join("\n")
        )));
    }

    Ok(())
}
