//! Report styling and column geometry

use crate::error::DcfResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Immutable styling configuration injected into the renderer.
///
/// Column indices are zero-based, matching the writer API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Output worksheet name
    pub sheet_name: String,
    /// Company name printed above every schedule title
    pub company_name: Option<String>,
    pub font_name: String,
    pub font_size: f64,
    pub company_font_size: f64,
    pub title_font_size: f64,
    /// RGB colour of historical figures
    pub historical_font_color: u32,
    /// Widths of the gutter/label columns A..G
    pub leading_column_widths: Vec<f64>,
    pub period_column_width: f64,
    /// Column holding row labels
    pub label_column: u16,
    /// Column of the first period
    pub first_period_column: u16,
    pub default_row_height: f64,
    pub company_row_height: f64,
    pub title_row_height: f64,
    pub separator_row_height: f64,
    /// Deepest indent level used for section headers
    pub max_section_indent: u8,
    /// Deepest indent level used for data labels
    pub max_label_indent: u8,
    pub historical_suffix: String,
    pub projected_suffix: String,
    pub projected_banner: String,
    pub integer_format: String,
    pub decimal_format: String,
    pub percent_format: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Model".to_string(),
            company_name: None,
            font_name: "Calibri".to_string(),
            font_size: 11.0,
            company_font_size: 18.0,
            title_font_size: 14.0,
            historical_font_color: 0x0000FF,
            leading_column_widths: vec![3.0, 1.0, 1.0, 11.0, 13.5, 9.75, 1.0],
            period_column_width: 8.5,
            label_column: 2,
            first_period_column: 7,
            default_row_height: 12.75,
            company_row_height: 23.25,
            title_row_height: 18.75,
            separator_row_height: 3.0,
            max_section_indent: 1,
            max_label_indent: 3,
            historical_suffix: "A".to_string(),
            projected_suffix: "E".to_string(),
            projected_banner: "Projected".to_string(),
            integer_format: "#,##0_);(#,##0);-_)".to_string(),
            decimal_format: "#,##0.0_);(#,##0.0);-_)".to_string(),
            percent_format: "0.0%;(0.0%)".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Load overrides from a YAML file; missing keys keep their defaults
    pub fn from_yaml_file(path: &Path) -> DcfResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn with_company_name(mut self, name: Option<String>) -> Self {
        self.company_name = name;
        self
    }

    /// Column of the i-th period in domain order
    pub fn period_column(&self, position: usize) -> u16 {
        self.first_period_column + position as u16
    }

    /// Last column spanned by titles and separators
    pub fn last_column(&self, period_count: usize) -> u16 {
        self.period_column(period_count.max(1) - 1)
    }

    /// Excel number format for a period header (`0"A"` / `0"E"`)
    pub fn period_header_format(&self, suffix: &str) -> String {
        format!("0\"{}\"", suffix)
    }
}
