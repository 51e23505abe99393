//! Excel exporter implementation - rendered report → .xlsx

use crate::core::format_classifier::FormatClass;
use crate::error::{DcfError, DcfResult};
use crate::excel::layout::LayoutConfig;
use crate::excel::render::{CellContent, CellStyle, RenderedReport, ReportRenderer};
use crate::schedule::Model;
use crate::types::PeriodKind;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::HashMap;
use std::path::Path;

/// Writes every schedule of a model onto one formatted worksheet
pub struct ExcelExporter {
    layout: LayoutConfig,
}

impl ExcelExporter {
    /// Create a new Excel exporter
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Lay the model out without writing anything
    pub fn render(&self, model: &Model) -> RenderedReport {
        ReportRenderer::new(&self.layout, model.domain()).render(model.schedules())
    }

    /// Export the model to an Excel .xlsx file
    pub fn export(&self, model: &Model, output_path: &Path) -> DcfResult<()> {
        let is_xlsx = output_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
        if !is_xlsx {
            return Err(DcfError::UnsupportedOutput(output_path.display().to_string()));
        }

        let report = self.render(model);
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.layout.sheet_name)
            .map_err(|e| DcfError::Export(format!("Failed to set worksheet name: {}", e)))?;
        worksheet.set_screen_gridlines(false);
        worksheet.set_print_gridlines(false);

        self.setup_columns(worksheet, model.domain().len())?;
        self.write_report(worksheet, &report)?;

        workbook
            .save(output_path)
            .map_err(|e| DcfError::Export(format!("Failed to save Excel file: {}", e)))?;

        tracing::info!(
            path = %output_path.display(),
            schedules = model.schedules().len(),
            rows = report.total_rows,
            "exported report"
        );
        Ok(())
    }

    fn setup_columns(&self, worksheet: &mut Worksheet, period_count: usize) -> DcfResult<()> {
        for (col, width) in self.layout.leading_column_widths.iter().enumerate() {
            worksheet
                .set_column_width(col as u16, *width)
                .map_err(|e| DcfError::Export(format!("Failed to set column width: {}", e)))?;
        }
        for pos in 0..period_count {
            worksheet
                .set_column_width(self.layout.period_column(pos), self.layout.period_column_width)
                .map_err(|e| DcfError::Export(format!("Failed to set column width: {}", e)))?;
        }
        Ok(())
    }

    fn write_report(&self, worksheet: &mut Worksheet, report: &RenderedReport) -> DcfResult<()> {
        for (&row, &height) in &report.row_heights {
            worksheet
                .set_row_height(row, height)
                .map_err(|e| DcfError::Export(format!("Failed to set row height: {}", e)))?;
        }

        let mut formats: HashMap<CellStyle, Format> = HashMap::new();
        for cell in &report.cells {
            let format = formats
                .entry(cell.style)
                .or_insert_with(|| self.format_for(cell.style));
            match &cell.content {
                CellContent::Text(text) => {
                    worksheet
                        .write_string_with_format(cell.row, cell.col, text, format)
                        .map_err(|e| DcfError::Export(format!("Failed to write text: {}", e)))?;
                }
                CellContent::Number(value) => {
                    worksheet
                        .write_number_with_format(cell.row, cell.col, *value, format)
                        .map_err(|e| DcfError::Export(format!("Failed to write number: {}", e)))?;
                }
                CellContent::Blank => {
                    worksheet
                        .write_blank(cell.row, cell.col, format)
                        .map_err(|e| DcfError::Export(format!("Failed to write blank: {}", e)))?;
                }
            }
        }
        Ok(())
    }

    /// Concrete format for a cell role
    fn format_for(&self, style: CellStyle) -> Format {
        let layout = &self.layout;
        let base = Format::new()
            .set_font_name(layout.font_name.as_str())
            .set_font_size(layout.font_size);

        match style {
            CellStyle::CompanyTitle => base
                .set_font_size(layout.company_font_size)
                .set_bold()
                .set_align(FormatAlign::CenterAcross)
                .set_align(FormatAlign::VerticalCenter),
            CellStyle::ScheduleTitle => base
                .set_font_size(layout.title_font_size)
                .set_bold()
                .set_align(FormatAlign::CenterAcross)
                .set_align(FormatAlign::VerticalCenter),
            CellStyle::Separator => Format::new().set_border_bottom(FormatBorder::Medium),
            CellStyle::ProjectedBanner => base.set_bold().set_align(FormatAlign::Center),
            CellStyle::PeriodHeader(PeriodKind::Historical) => base
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_num_format(layout.period_header_format(&layout.historical_suffix)),
            CellStyle::PeriodHeader(PeriodKind::Projected) => base
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_num_format(layout.period_header_format(&layout.projected_suffix))
                .set_border_bottom(FormatBorder::Thin),
            CellStyle::SectionLabel { indent } => base.set_bold().set_indent(indent),
            CellStyle::DataLabel { indent } => base.set_indent(indent),
            CellStyle::Value { class, kind } => {
                let num_format = match class {
                    FormatClass::Integer => &layout.integer_format,
                    FormatClass::Decimal => &layout.decimal_format,
                    FormatClass::Percent => &layout.percent_format,
                };
                let format = base
                    .set_num_format(num_format.as_str())
                    .set_align(FormatAlign::Right);
                match kind {
                    PeriodKind::Historical => format.set_font_color(layout.historical_font_color),
                    PeriodKind::Projected => format,
                }
            }
        }
    }
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
