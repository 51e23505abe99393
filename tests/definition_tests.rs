//! Bundled schedule book tests

use dcf_forge::core::flattener::{flatten, record_count};
use dcf_forge::core::{classify, FormatClass, SheetSource, YearBounds};
use dcf_forge::excel::{LayoutConfig, ReportRenderer, PREAMBLE_ROWS};
use dcf_forge::schedule::{FieldDef, FieldKind, Model, ScheduleBook};
use dcf_forge::types::CellValue;
use dcf_forge::{Grid, PeriodDomain};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn leaf_keys(fields: &[FieldDef], out: &mut Vec<String>) {
    for field in fields {
        match field.kind().unwrap() {
            FieldKind::Leaf(reference) => out.push(reference.to_string()),
            FieldKind::Group(children) => leaf_keys(children, out),
        }
    }
}

/// One grid per sheet the book reads, with every key it references
fn synthetic_workbook(book: &ScheduleBook) -> Vec<(String, Grid)> {
    let domain = book.domain().unwrap();
    let mut sheets: HashMap<String, Vec<String>> = HashMap::new();
    let mut order = Vec::new();
    for schedule in &book.schedules {
        let name = schedule.sheet_name().to_string();
        if !sheets.contains_key(&name) {
            order.push(name.clone());
        }
        leaf_keys(&schedule.fields, sheets.entry(name).or_default());
    }

    order
        .into_iter()
        .map(|name| {
            let mut grid = Grid::new();
            for (i, year) in domain.years().enumerate() {
                grid.insert(1, 2 + i as u32, CellValue::Number(f64::from(year)));
            }
            for (r, key) in sheets[&name].iter().enumerate() {
                let row = 2 + r as u32;
                grid.insert(row, 1, CellValue::Text(key.clone()));
                for (i, year) in domain.years().enumerate() {
                    grid.insert(row, 2 + i as u32, CellValue::Number(f64::from(year - 2000)));
                }
            }
            (name, grid)
        })
        .collect()
}

#[test]
fn test_bundled_book_shape() {
    let book = ScheduleBook::bundled().unwrap();
    let names: Vec<&str> = book.schedules.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Oil Revenue Schedule",
            "Crude Products Revenue Schedule",
            "Other Products Revenue Schedule",
            "Downstream Revenue Schedule",
            "Total Revenue Schedule",
            "Production Costs Expenses Schedule",
            "S&A Expenses Schedule",
            "Income Statement",
            "Cash Flow Statement",
            "Balance Sheet",
            "Fixed Assets (PP&E) Schedule",
            "Working Capital Schedule",
            "Debt and Interest Schedule",
            "Shareholders' Equity Schedule",
        ]
    );
    let total: usize = book.schedules.iter().map(|s| s.field_count()).sum();
    assert_eq!(total, 372);
    assert_eq!(book.company.as_deref(), Some("Yacimientos Petrolíferos Fiscales S.A."));
}

#[test]
fn test_bundled_book_builds_and_renders() {
    let book = ScheduleBook::bundled().unwrap();
    let domain = book.domain().unwrap();
    let source = SheetSource::from_grids(
        synthetic_workbook(&book),
        domain.clone(),
        YearBounds::default(),
    );

    let model = Model::build(Box::new(source), &book).unwrap();
    assert_eq!(model.schedules().len(), 14);

    let income = model.schedule("Income Statement").unwrap();
    for record in flatten(&income.root) {
        if let Some(series) = record.series {
            assert_eq!(series.len(), domain.len(), "{}", record.label);
        }
    }

    let layout = LayoutConfig::default();
    let renderer = ReportRenderer::new(&layout, &domain);
    let plans = renderer.plan(model.schedules());
    let report = renderer.render(model.schedules());

    let expected_rows: u32 = model
        .schedules()
        .iter()
        .map(|s| PREAMBLE_ROWS + record_count(&s.root) as u32)
        .sum();
    assert_eq!(report.total_rows, expected_rows);
    for (plan, schedule) in plans.iter().zip(model.schedules()) {
        let title = report.cell(plan.start_row + 2, layout.label_column).unwrap();
        assert_eq!(title.display_text(&layout), schedule.name);
    }
}

#[test]
fn test_bundled_labels_classify_as_expected() {
    let book = ScheduleBook::bundled().unwrap();
    let source = SheetSource::from_grids(
        synthetic_workbook(&book),
        PeriodDomain::default(),
        YearBounds::default(),
    );
    let model = Model::build(Box::new(source), &book).unwrap();

    let oil = model.schedule("Oil Revenue Schedule").unwrap();
    let pricing = oil.series(&["pricing", "ngl"]).unwrap();
    assert_eq!(classify("Ngl", pricing), FormatClass::Integer);
    assert_eq!(classify("Pricing Ngl", pricing), FormatClass::Decimal);
}
