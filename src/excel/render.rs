//! Report layout: schedules → positioned, styled cells
//!
//! Rendering is split in two passes so row positions never need patching:
//! 1. `plan` counts rows per schedule and reserves a row range for each block
//! 2. `render_block` fills one reserved range from its schedule alone
//!
//! Blocks share no state, so any subset can be rendered independently once the
//! plan exists.

use crate::core::flattener::{flatten, record_count};
use crate::core::format_classifier::{classify, FormatClass};
use crate::excel::layout::LayoutConfig;
use crate::types::{PeriodDomain, PeriodKind, Schedule};
use std::collections::BTreeMap;

/// Rows written above the first data row of every schedule:
/// spacer, company, title, separator, banner, period header, spacer
pub const PREAMBLE_ROWS: u32 = 7;

/// Visual role of a cell; the writer maps each to one concrete format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStyle {
    CompanyTitle,
    ScheduleTitle,
    Separator,
    ProjectedBanner,
    PeriodHeader(PeriodKind),
    SectionLabel { indent: u8 },
    DataLabel { indent: u8 },
    Value { class: FormatClass, kind: PeriodKind },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Text(String),
    Number(f64),
    Blank,
}

/// One output cell (zero-based coordinates)
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    pub row: u32,
    pub col: u16,
    pub content: CellContent,
    pub style: CellStyle,
}

impl ReportCell {
    /// Text as a spreadsheet user would see it, e.g. `2020A` for a period header
    pub fn display_text(&self, layout: &LayoutConfig) -> String {
        match (&self.content, self.style) {
            (CellContent::Number(year), CellStyle::PeriodHeader(kind)) => {
                let suffix = match kind {
                    PeriodKind::Historical => &layout.historical_suffix,
                    PeriodKind::Projected => &layout.projected_suffix,
                };
                format!("{}{}", *year as i64, suffix)
            }
            (CellContent::Number(n), _) => n.to_string(),
            (CellContent::Text(s), _) => s.clone(),
            (CellContent::Blank, _) => String::new(),
        }
    }
}

/// Row range reserved for one schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlan {
    /// Index into the model's schedule list
    pub schedule: usize,
    pub start_row: u32,
    pub rows: u32,
}

impl BlockPlan {
    pub fn end_row(&self) -> u32 {
        self.start_row + self.rows
    }
}

/// Cells and row heights for one schedule block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedBlock {
    pub cells: Vec<ReportCell>,
    pub row_heights: Vec<(u32, f64)>,
}

/// Every block of a report, merged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedReport {
    pub cells: Vec<ReportCell>,
    pub row_heights: BTreeMap<u32, f64>,
    pub total_rows: u32,
}

impl RenderedReport {
    pub fn cell(&self, row: u32, col: u16) -> Option<&ReportCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: u32) -> Vec<&ReportCell> {
        let mut cells: Vec<&ReportCell> = self.cells.iter().filter(|c| c.row == row).collect();
        cells.sort_by_key(|c| c.col);
        cells
    }
}

/// Lays schedules out on a single sheet
pub struct ReportRenderer<'a> {
    layout: &'a LayoutConfig,
    domain: &'a PeriodDomain,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(layout: &'a LayoutConfig, domain: &'a PeriodDomain) -> Self {
        Self { layout, domain }
    }

    /// Sequential size-counting pass: one block per schedule, in order
    pub fn plan(&self, schedules: &[Schedule]) -> Vec<BlockPlan> {
        let mut start_row = 0;
        schedules
            .iter()
            .enumerate()
            .map(|(idx, schedule)| {
                let rows = PREAMBLE_ROWS + record_count(&schedule.root) as u32;
                let plan = BlockPlan {
                    schedule: idx,
                    start_row,
                    rows,
                };
                start_row += rows;
                plan
            })
            .collect()
    }

    pub fn render(&self, schedules: &[Schedule]) -> RenderedReport {
        let plans = self.plan(schedules);
        let mut report = RenderedReport {
            total_rows: plans.last().map(BlockPlan::end_row).unwrap_or(0),
            ..Default::default()
        };
        for plan in &plans {
            let block = self.render_block(&schedules[plan.schedule], plan.start_row);
            report.cells.extend(block.cells);
            report.row_heights.extend(block.row_heights);
        }
        report
    }

    /// Render one schedule into the rows starting at `start_row`
    pub fn render_block(&self, schedule: &Schedule, start_row: u32) -> RenderedBlock {
        let layout = self.layout;
        let last_col = layout.last_column(self.domain.len());
        let mut block = RenderedBlock::default();
        let mut row = start_row;

        // Spacer
        block.row_heights.push((row, layout.default_row_height));
        row += 1;

        // Company title
        if let Some(company) = &layout.company_name {
            self.center_across(&mut block, row, company, CellStyle::CompanyTitle, last_col);
        }
        block.row_heights.push((row, layout.company_row_height));
        row += 1;

        // Schedule title
        self.center_across(&mut block, row, &schedule.name, CellStyle::ScheduleTitle, last_col);
        block.row_heights.push((row, layout.title_row_height));
        row += 1;

        // Separator
        for col in layout.label_column..=last_col {
            block.cells.push(ReportCell {
                row,
                col,
                content: CellContent::Blank,
                style: CellStyle::Separator,
            });
        }
        block.row_heights.push((row, layout.separator_row_height));
        row += 1;

        // "Projected" banner over the first projected period
        if let Some(first) = self.domain.projected().first() {
            if let Some(pos) = self.domain.position(*first) {
                block.cells.push(ReportCell {
                    row,
                    col: layout.period_column(pos),
                    content: CellContent::Text(layout.projected_banner.clone()),
                    style: CellStyle::ProjectedBanner,
                });
            }
        }
        block.row_heights.push((row, layout.default_row_height));
        row += 1;

        // Period header
        for (pos, (year, kind)) in self.domain.periods().enumerate() {
            block.cells.push(ReportCell {
                row,
                col: layout.period_column(pos),
                content: CellContent::Number(f64::from(year)),
                style: CellStyle::PeriodHeader(kind),
            });
        }
        block.row_heights.push((row, layout.default_row_height));
        row += 1;

        // Spacer before data
        block.row_heights.push((row, layout.default_row_height));
        row += 1;

        for record in flatten(&schedule.root) {
            block.row_heights.push((row, layout.default_row_height));
            match record.series {
                None => {
                    let indent = record.depth.min(layout.max_section_indent as usize) as u8 + 1;
                    block.cells.push(ReportCell {
                        row,
                        col: layout.label_column,
                        content: CellContent::Text(record.label),
                        style: CellStyle::SectionLabel { indent },
                    });
                }
                Some(series) => {
                    let indent = record.depth.min(layout.max_label_indent as usize) as u8 + 1;
                    let class = classify(&record.label, series);
                    block.cells.push(ReportCell {
                        row,
                        col: layout.label_column,
                        content: CellContent::Text(record.label),
                        style: CellStyle::DataLabel { indent },
                    });
                    for (pos, (year, kind)) in self.domain.periods().enumerate() {
                        // Absent periods stay blank
                        let Some(value) = series.get(year) else {
                            continue;
                        };
                        block.cells.push(ReportCell {
                            row,
                            col: layout.period_column(pos),
                            content: CellContent::Number(value),
                            style: CellStyle::Value { class, kind },
                        });
                    }
                }
            }
            row += 1;
        }

        block
    }

    fn center_across(
        &self,
        block: &mut RenderedBlock,
        row: u32,
        text: &str,
        style: CellStyle,
        last_col: u16,
    ) {
        let first = self.layout.label_column;
        block.cells.push(ReportCell {
            row,
            col: first,
            content: CellContent::Text(text.to_string()),
            style,
        });
        for col in first + 1..=last_col {
            block.cells.push(ReportCell {
                row,
                col,
                content: CellContent::Blank,
                style,
            });
        }
    }
}
