//! Source layout tests: real workbooks and CSV files on disk
//!
//! Workbooks are written with rust_xlsxwriter into a scratch directory and read
//! back through the importer, so the calamine path is exercised end to end.

use dcf_forge::core::{FieldRef, SeriesSource, SheetSource, YearBounds};
use dcf_forge::excel::{InputKind, WorkbookImporter};
use dcf_forge::schedule::{open_source, Model, ScheduleBook, SourceLayout};
use dcf_forge::{DcfError, PeriodDomain, Series};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BOOK: &str = r#"
periods:
  historical: [2020]
  projected: [2021]
source:
  first_period_column: 2
  key_column: 1
schedules:
  - name: Income Statement
    fields:
      - { key: revenue, field: revenue }
      - key: costs
        children:
          - { key: cost_of_sales, field: cogs }
"#;

fn series(pairs: &[(i32, f64)]) -> Series {
    pairs.iter().copied().collect()
}

/// Header [_, 2020, 2021]; revenue, cogs and a row with a text cell
fn write_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("model.xlsx");
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Income Statement").unwrap();
    sheet.write_string(0, 0, "field").unwrap();
    sheet.write_number(0, 1, 2020).unwrap();
    sheet.write_number(0, 2, 2021).unwrap();
    sheet.write_string(1, 0, "revenue").unwrap();
    sheet.write_number(1, 1, 100).unwrap();
    sheet.write_number(1, 2, 110).unwrap();
    sheet.write_string(2, 0, "cogs").unwrap();
    sheet.write_number(2, 1, -60).unwrap();
    sheet.write_number(2, 2, -66).unwrap();
    sheet.write_string(3, 0, "capex").unwrap();
    sheet.write_number(3, 1, 25).unwrap();
    sheet.write_string(3, 2, "n/a").unwrap();

    let other = workbook.add_worksheet();
    other.set_name("Notes").unwrap();
    other.write_string(0, 0, "prepared by finance").unwrap();

    workbook.save(&path).unwrap();
    path
}

fn write_csv(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("model.csv");
    fs::write(
        &path,
        "field,2020,2021\nrevenue,100,110\ncogs,-60,-66\ncapex,25,n/a\n",
    )
    .unwrap();
    path
}

#[test]
fn test_workbook_header_row_maps_years() {
    let dir = TempDir::new().unwrap();
    let importer = WorkbookImporter::new(write_workbook(&dir)).unwrap();
    assert_eq!(importer.kind(), InputKind::Workbook);

    let source = SheetSource::from_grids(
        importer.load_sheets().unwrap(),
        PeriodDomain::default(),
        YearBounds::default(),
    );
    let revenue = source
        .resolve(Some("Income Statement"), &FieldRef::from("revenue"))
        .unwrap();
    assert_eq!(revenue, series(&[(2020, 100.0), (2021, 110.0)]));
}

#[test]
fn test_text_cell_is_omitted() {
    let dir = TempDir::new().unwrap();
    let importer = WorkbookImporter::new(write_workbook(&dir)).unwrap();
    let source = SheetSource::from_grids(
        importer.load_sheets().unwrap(),
        PeriodDomain::default(),
        YearBounds::default(),
    );

    let capex = source
        .resolve(Some("Income Statement"), &FieldRef::from("capex"))
        .unwrap();
    assert_eq!(capex, series(&[(2020, 25.0)]));
}

#[test]
fn test_unknown_sheet_lists_workbook_sheets() {
    let dir = TempDir::new().unwrap();
    let book = ScheduleBook::from_yaml_str(BOOK).unwrap();
    let source = open_source(&write_workbook(&dir), SourceLayout::Auto, &book).unwrap();

    let err = source
        .resolve(Some("Balance Sheet"), &FieldRef::from("cash"))
        .unwrap_err();
    assert!(matches!(err, DcfError::SheetNotFound { .. }));
    assert_eq!(
        err.alternatives().unwrap(),
        &["Income Statement".to_string(), "Notes".to_string()]
    );
}

#[test]
fn test_missing_sheet_for_fixed_layout() {
    let dir = TempDir::new().unwrap();
    // The book reads the fixed grid from a sheet called "Model"
    let book = ScheduleBook::from_yaml_str(BOOK).unwrap();
    let err = open_source(&write_workbook(&dir), SourceLayout::Fixed, &book).unwrap_err();
    assert!(matches!(err, DcfError::SheetNotFound { ref sheet, .. } if sheet == "Model"));
}

#[test]
fn test_fixed_and_sheet_layouts_agree() {
    let dir = TempDir::new().unwrap();
    let book = ScheduleBook::from_yaml_str(BOOK).unwrap();

    let from_csv = Model::load(&write_csv(&dir), SourceLayout::Auto, &book).unwrap();
    let from_workbook = Model::load(&write_workbook(&dir), SourceLayout::Auto, &book).unwrap();

    assert_eq!(from_csv.summary(), from_workbook.summary());
    let cost = from_workbook.schedules()[0]
        .series(&["costs", "cost_of_sales"])
        .unwrap();
    assert_eq!(cost, &series(&[(2020, -60.0), (2021, -66.0)]));
}

#[test]
fn test_layouts_agree_on_repeated_keys() {
    let dir = TempDir::new().unwrap();
    let book = ScheduleBook::from_yaml_str(BOOK).unwrap();

    let csv = dir.path().join("repeated.csv");
    fs::write(
        &csv,
        "field,2020,2021\nrevenue,100,110\nrevenue,999,998\ncogs,-60,-66\n",
    )
    .unwrap();

    let xlsx = dir.path().join("repeated.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Income Statement").unwrap();
    sheet.write_string(0, 0, "field").unwrap();
    sheet.write_number(0, 1, 2020).unwrap();
    sheet.write_number(0, 2, 2021).unwrap();
    for (row, (key, a, b)) in [("revenue", 100, 110), ("revenue", 999, 998), ("cogs", -60, -66)]
        .into_iter()
        .enumerate()
    {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, key).unwrap();
        sheet.write_number(row, 1, a).unwrap();
        sheet.write_number(row, 2, b).unwrap();
    }
    workbook.save(&xlsx).unwrap();

    let fixed = Model::load(&csv, SourceLayout::Auto, &book).unwrap();
    let sheets = Model::load(&xlsx, SourceLayout::Auto, &book).unwrap();

    assert_eq!(fixed.summary(), sheets.summary());
    assert_eq!(
        fixed.schedules()[0].series(&["revenue"]).unwrap(),
        &series(&[(2020, 999.0), (2021, 998.0)])
    );
}

#[test]
fn test_fixed_row_accessors() {
    let dir = TempDir::new().unwrap();
    let book = ScheduleBook::from_yaml_str(BOOK).unwrap();
    let source = open_source(&write_csv(&dir), SourceLayout::Auto, &book).unwrap();

    assert_eq!(source.sheet_names(), Vec::<String>::new());
    assert_eq!(
        source.field_keys(None).unwrap(),
        vec!["field", "revenue", "cogs", "capex"]
    );
    assert_eq!(
        source.resolve(None, &FieldRef::Row(3)).unwrap(),
        series(&[(2020, -60.0), (2021, -66.0)])
    );
}

#[test]
fn test_empty_csv_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();

    let importer = WorkbookImporter::new(&path).unwrap();
    assert!(matches!(
        importer.load_grid("Model"),
        Err(DcfError::EmptyInput(_))
    ));
}
