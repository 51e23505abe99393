use crate::error::{DcfError, DcfResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Periods
//==============================================================================

/// A calendar year of data
pub type Year = i32;

/// Which half of the period domain a year belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    /// Reported actuals ("A" suffix in reports)
    Historical,
    /// Model estimates ("E" suffix in reports)
    Projected,
}

/// The fixed All-Periods domain: historical years followed by projected years
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDomain {
    historical: Vec<Year>,
    projected: Vec<Year>,
}

impl PeriodDomain {
    /// Build a domain, checking both halves are strictly ascending and disjoint
    pub fn new(historical: Vec<Year>, projected: Vec<Year>) -> DcfResult<Self> {
        for (name, years) in [("historical", &historical), ("projected", &projected)] {
            if years.windows(2).any(|w| w[0] >= w[1]) {
                return Err(DcfError::Periods(format!(
                    "{} years must be strictly ascending: {:?}",
                    name, years
                )));
            }
        }
        if let Some(year) = historical.iter().find(|y| projected.contains(y)) {
            return Err(DcfError::Periods(format!(
                "year {} is both historical and projected",
                year
            )));
        }
        if historical.is_empty() && projected.is_empty() {
            return Err(DcfError::Periods("domain has no periods".to_string()));
        }
        Ok(Self {
            historical,
            projected,
        })
    }

    /// Build a domain from two inclusive year ranges
    pub fn from_ranges(
        historical: std::ops::RangeInclusive<Year>,
        projected: std::ops::RangeInclusive<Year>,
    ) -> DcfResult<Self> {
        Self::new(historical.collect(), projected.collect())
    }

    pub fn historical(&self) -> &[Year] {
        &self.historical
    }

    pub fn projected(&self) -> &[Year] {
        &self.projected
    }

    /// All years in domain order (historical, then projected)
    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.historical.iter().chain(self.projected.iter()).copied()
    }

    /// All years paired with their kind, in domain order
    pub fn periods(&self) -> impl Iterator<Item = (Year, PeriodKind)> + '_ {
        self.historical
            .iter()
            .map(|&y| (y, PeriodKind::Historical))
            .chain(self.projected.iter().map(|&y| (y, PeriodKind::Projected)))
    }

    pub fn len(&self) -> usize {
        self.historical.len() + self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, year: Year) -> bool {
        self.kind_of(year).is_some()
    }

    pub fn kind_of(&self, year: Year) -> Option<PeriodKind> {
        if self.historical.contains(&year) {
            Some(PeriodKind::Historical)
        } else if self.projected.contains(&year) {
            Some(PeriodKind::Projected)
        } else {
            None
        }
    }

    /// Zero-based position of a year in domain order
    pub fn position(&self, year: Year) -> Option<usize> {
        self.years().position(|y| y == year)
    }
}

impl Default for PeriodDomain {
    /// 2020-2024 actuals, 2025-2034 estimates
    fn default() -> Self {
        Self {
            historical: (2020..=2024).collect(),
            projected: (2025..=2034).collect(),
        }
    }
}

//==============================================================================
// Cells
//==============================================================================

/// A raw scalar read from a spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Numeric coercion: numbers pass through, text is parsed after trimming
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            CellValue::Number(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

//==============================================================================
// Series / Section / Schedule
//==============================================================================

/// Ordered, sparse mapping from year to value for one line item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    values: BTreeMap<Year, f64>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, year: Year, value: f64) {
        self.values.insert(year, value);
    }

    pub fn get(&self, year: Year) -> Option<f64> {
        self.values.get(&year).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Year, f64)> + '_ {
        self.values.iter().map(|(&y, &v)| (y, v))
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.values.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.values().copied()
    }

    /// Restrict to the years of one half of the domain
    pub fn filter_kind(&self, domain: &PeriodDomain, kind: PeriodKind) -> Series {
        self.iter()
            .filter(|(y, _)| domain.kind_of(*y) == Some(kind))
            .collect()
    }
}

impl FromIterator<(Year, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (Year, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A member of a section: either a nested section or a leaf series
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Section(Section),
    Leaf(Series),
}

impl Node {
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Node::Leaf(series) => Some(series),
            Node::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Node::Section(section) => Some(section),
            Node::Leaf(_) => None,
        }
    }
}

/// Named, ordered collection of child nodes (insertion order is document order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    entries: Vec<(String, Node)>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        self.entries.push((key.into(), node));
    }

    pub fn push_series(&mut self, key: impl Into<String>, series: Series) {
        self.push(key, Node::Leaf(series));
    }

    pub fn push_section(&mut self, key: impl Into<String>, section: Section) {
        self.push(key, Node::Section(section));
    }

    /// Builder-style push
    pub fn with(mut self, key: impl Into<String>, node: Node) -> Self {
        self.push(key, node);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    /// Walk a key path (e.g. `["margins", "ebitda_margin"]`)
    pub fn get_path(&self, path: &[&str]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let node = self.get(first)?;
        if rest.is_empty() {
            return Some(node);
        }
        node.as_section()?.get_path(rest)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Source rows covered by a schedule in the fixed layout (documentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: u32,
    pub end: u32,
}

/// One financial statement or supporting exhibit
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub name: String,
    pub sheet: Option<String>,
    pub rows: Option<RowRange>,
    pub root: Section,
}

impl Schedule {
    pub fn new(name: impl Into<String>, root: Section) -> Self {
        Self {
            name: name.into(),
            sheet: None,
            rows: None,
            root,
        }
    }

    pub fn get(&self, path: &[&str]) -> Option<&Node> {
        self.root.get_path(path)
    }

    /// Shortcut for a leaf at `path`
    pub fn series(&self, path: &[&str]) -> Option<&Series> {
        self.get(path).and_then(Node::as_series)
    }
}
