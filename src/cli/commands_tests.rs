use super::*;
use std::io::Write;
use tempfile::TempDir;

// =========================================================================
// format_value Tests
// =========================================================================

#[test]
fn test_format_value_integer() {
    assert_eq!(format_value(FormatClass::Integer, 1234567.4), "1,234,567");
    assert_eq!(format_value(FormatClass::Integer, 999.0), "999");
    assert_eq!(format_value(FormatClass::Integer, -1500.0), "(1,500)");
}

#[test]
fn test_format_value_zero_is_dash() {
    assert_eq!(format_value(FormatClass::Integer, 0.0), "-");
    assert_eq!(format_value(FormatClass::Decimal, 0.0), "-");
    assert_eq!(format_value(FormatClass::Percent, 0.0), "0.0%");
}

#[test]
fn test_format_value_decimal() {
    assert_eq!(format_value(FormatClass::Decimal, 71.26), "71.3");
    assert_eq!(format_value(FormatClass::Decimal, 12345.0), "12,345.0");
}

#[test]
fn test_format_value_percent() {
    assert_eq!(format_value(FormatClass::Percent, 0.315), "31.5%");
    assert_eq!(format_value(FormatClass::Percent, -0.05), "(5.0%)");
}

#[test]
fn test_period_label() {
    assert_eq!(period_label(2024, PeriodKind::Historical), "2024A");
    assert_eq!(period_label(2025, PeriodKind::Projected), "2025E");
}

// =========================================================================
// Command Tests
// =========================================================================

fn write_definitions(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("book.yaml");
    let mut file = fs::File::create(&path).unwrap();
    write!(
        file,
        r#"
company: Test Co
periods:
  historical: [2020, 2021]
  projected: [2022]
source:
  first_period_column: 2
  key_column: 1
schedules:
  - name: Income Statement
    fields:
      - {{ key: revenue, field: revenue }}
      - key: margins
        children:
          - {{ key: ebitda_margin, field: margin }}
"#
    )
    .unwrap();
    path
}

fn write_input(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("model.csv");
    fs::write(&path, "revenue,100,110,121\nmargin,0.30,0.31,0.32\n").unwrap();
    path
}

fn options(dir: &TempDir) -> LoadOptions {
    LoadOptions {
        definitions: Some(write_definitions(dir)),
        layout: SourceLayout::Auto,
    }
}

#[test]
fn test_export_command_writes_xlsx() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.xlsx");

    let result = export(write_input(&dir), output.clone(), &options(&dir), None, None, true);
    assert!(result.is_ok(), "export failed: {:?}", result.err());
    assert!(output.exists());
}

#[test]
fn test_export_command_missing_input() {
    let dir = TempDir::new().unwrap();
    let result = export(
        dir.path().join("missing.csv"),
        dir.path().join("report.xlsx"),
        &options(&dir),
        None,
        None,
        false,
    );
    assert!(matches!(result, Err(DcfError::Io(_))));
}

#[test]
fn test_show_unknown_schedule_lists_alternatives() {
    let dir = TempDir::new().unwrap();
    let err = show(write_input(&dir), &options(&dir), Some("Cash Flow".to_string())).unwrap_err();
    assert_eq!(err.alternatives().unwrap(), &["Income Statement".to_string()]);
}

#[test]
fn test_resolve_command() {
    let dir = TempDir::new().unwrap();
    let result = resolve(write_input(&dir), &options(&dir), None, FieldRef::from("margin"), true);
    assert!(result.is_ok());

    let missing = resolve(write_input(&dir), &options(&dir), None, FieldRef::from("capex"), false);
    assert!(matches!(missing, Err(DcfError::FieldNotFound { .. })));
}

#[test]
fn test_summary_command_writes_snapshot_that_loads_back() {
    let dir = TempDir::new().unwrap();
    let opts = options(&dir);
    let snapshot = dir.path().join("snapshot.yaml");

    summary(write_input(&dir), &opts, Some(snapshot.clone())).unwrap();

    let model = opts.load_model(&snapshot).unwrap();
    assert_eq!(model.company(), Some("Test Co"));
    let revenue = model.schedules()[0].series(&["revenue"]).unwrap();
    assert_eq!(revenue.get(2022), Some(121.0));
}

#[test]
fn test_sheets_command_on_csv() {
    let dir = TempDir::new().unwrap();
    assert!(sheets(write_input(&dir), &options(&dir)).is_ok());
}
