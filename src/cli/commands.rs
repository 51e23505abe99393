use crate::core::flattener::{flatten, record_count};
use crate::core::format_classifier::{classify, FormatClass};
use crate::core::series_source::FieldRef;
use crate::error::{DcfError, DcfResult};
use crate::excel::{ExcelExporter, LayoutConfig};
use crate::schedule::{open_source, Model, ScheduleBook, SourceLayout};
use crate::types::{PeriodDomain, PeriodKind, Schedule, Series, Year};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

const LABEL_WIDTH: usize = 44;
const VALUE_WIDTH: usize = 11;

/// Where schedule definitions come from and how the input is laid out
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Schedule book YAML; the bundled book when absent
    pub definitions: Option<PathBuf>,
    pub layout: SourceLayout,
}

impl LoadOptions {
    pub fn book(&self) -> DcfResult<ScheduleBook> {
        match &self.definitions {
            Some(path) => ScheduleBook::from_file(path),
            None => ScheduleBook::bundled(),
        }
    }

    pub fn load_model(&self, input: &Path) -> DcfResult<Model> {
        let book = self.book()?;
        Model::load(input, self.layout, &book)
    }
}

/// `2020A` / `2025E`
fn period_label(year: Year, kind: PeriodKind) -> String {
    match kind {
        PeriodKind::Historical => format!("{}A", year),
        PeriodKind::Projected => format!("{}E", year),
    }
}

/// Insert thousands separators into a non-negative number
fn group_thousands(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

/// Console rendering of a value, mirroring the report's number formats
fn format_value(class: FormatClass, value: f64) -> String {
    if value == 0.0 && class != FormatClass::Percent {
        return "-".to_string();
    }
    let body = match class {
        FormatClass::Integer => group_thousands(value.abs(), 0),
        FormatClass::Decimal => group_thousands(value.abs(), 1),
        FormatClass::Percent => format!("{:.1}%", value.abs() * 100.0),
    };
    if value < 0.0 {
        format!("({})", body)
    } else {
        body
    }
}

fn period_header(domain: &PeriodDomain) -> String {
    domain
        .periods()
        .map(|(year, kind)| format!("{:>width$}", period_label(year, kind), width = VALUE_WIDTH))
        .collect()
}

fn print_schedule(schedule: &Schedule, domain: &PeriodDomain) {
    println!("{}", schedule.name.bold().bright_blue());
    println!(
        "{:<width$}{}",
        "",
        period_header(domain).bold(),
        width = LABEL_WIDTH
    );

    for record in flatten(&schedule.root) {
        let label = format!("{}{}", "  ".repeat(record.depth), record.label);
        let Some(series) = record.series else {
            println!("{}", label.bold());
            continue;
        };

        let class = classify(&record.label, series);
        let mut line = format!("{:<width$}", label, width = LABEL_WIDTH);
        for (year, kind) in domain.periods() {
            let text = series
                .get(year)
                .map(|v| format_value(class, v))
                .unwrap_or_default();
            let cell = format!("{:>width$}", text, width = VALUE_WIDTH);
            match kind {
                PeriodKind::Historical => line.push_str(&cell.blue().to_string()),
                PeriodKind::Projected => line.push_str(&cell),
            }
        }
        println!("{}", line);
    }
    println!();
}

fn print_series(label: &str, series: &Series, domain: &PeriodDomain) {
    let class = classify(label, series);
    for (year, kind) in domain.periods() {
        let Some(value) = series.get(year) else {
            continue;
        };
        println!(
            "   {}  {:>width$}",
            period_label(year, kind),
            format_value(class, value),
            width = VALUE_WIDTH
        );
    }
}

/// Execute the export command
pub fn export(
    input: PathBuf,
    output: PathBuf,
    options: &LoadOptions,
    style: Option<PathBuf>,
    company: Option<String>,
    verbose: bool,
) -> DcfResult<()> {
    println!("{}", "🔥 DCF Forge - Excel Export".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Loading model...".cyan());
    }

    let model = options.load_model(&input)?;

    if verbose {
        println!(
            "   Found {} schedules over {} periods\n",
            model.schedules().len(),
            model.domain().len()
        );
        for schedule in model.schedules() {
            println!(
                "   📊 {}: {} rows",
                schedule.name.bright_blue(),
                record_count(&schedule.root)
            );
        }
        println!();
    }

    let layout = match style {
        Some(path) => LayoutConfig::from_yaml_file(&path)?,
        None => LayoutConfig::default(),
    };
    // --company beats the style file, which beats the definitions
    let company = company
        .or_else(|| layout.company_name.clone())
        .or_else(|| model.company().map(str::to_string));
    let layout = layout.with_company_name(company);

    if verbose {
        println!("{}", "📊 Writing report...".cyan());
    }

    ExcelExporter::new(layout).export(&model, &output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}\n", output.display());

    Ok(())
}

/// Execute the show command
pub fn show(input: PathBuf, options: &LoadOptions, schedule: Option<String>) -> DcfResult<()> {
    println!("{}", "🔥 DCF Forge - Schedules".bold().green());
    println!("   Input: {}\n", input.display());

    let model = options.load_model(&input)?;

    let selected: Vec<&Schedule> = match &schedule {
        Some(name) => {
            let found = model.schedule(name).ok_or_else(|| DcfError::FieldNotFound {
                field: name.clone(),
                scope: "the loaded schedules".to_string(),
                available: model.schedules().iter().map(|s| s.name.clone()).collect(),
            })?;
            vec![found]
        }
        None => model.schedules().iter().collect(),
    };

    if selected.is_empty() {
        println!("{}", "⚠️  No schedules defined".yellow());
        return Ok(());
    }

    for schedule in selected {
        print_schedule(schedule, model.domain());
    }
    Ok(())
}

/// Execute the resolve command
pub fn resolve(
    input: PathBuf,
    options: &LoadOptions,
    sheet: Option<String>,
    field: FieldRef,
    json: bool,
) -> DcfResult<()> {
    let book = options.book()?;
    let source = open_source(&input, options.layout, &book)?;
    let series = source.resolve(sheet.as_deref(), &field)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    println!("{}", "🔍 DCF Forge - Resolve".bold().green());
    println!("   Source: {}", source.describe());
    match &sheet {
        Some(sheet) => println!("   Field:  {} / {}\n", sheet, field),
        None => println!("   Field:  {}\n", field),
    }

    if series.is_empty() {
        println!("{}", "⚠️  No numeric values in the period domain".yellow());
        return Ok(());
    }
    print_series(&field.to_string(), &series, source.domain());
    println!();
    Ok(())
}

/// Execute the summary command
pub fn summary(input: PathBuf, options: &LoadOptions, output: Option<PathBuf>) -> DcfResult<()> {
    let model = options.load_model(&input)?;
    let yaml = serde_yaml::to_string(&model.summary())?;

    match output {
        Some(path) => {
            fs::write(&path, yaml)?;
            println!("{}", "✅ Summary written".bold().green());
            println!("   YAML file: {}\n", path.display());
        }
        None => print!("{}", yaml),
    }
    Ok(())
}

/// Execute the sheets command
pub fn sheets(input: PathBuf, options: &LoadOptions) -> DcfResult<()> {
    let book = options.book()?;
    let source = open_source(&input, options.layout, &book)?;

    println!("{}", "📄 DCF Forge - Source Sheets".bold().green());
    println!("   Source: {}\n", source.describe());

    let names = source.sheet_names();
    if names.is_empty() {
        let keys = source.field_keys(None)?;
        println!("   {} keyed rows", keys.len());
        for key in keys {
            println!("      {}", key);
        }
        return Ok(());
    }

    for name in names {
        let keys = source.field_keys(Some(&name))?;
        let used_by: Vec<&str> = book
            .schedules
            .iter()
            .filter(|s| s.sheet_name() == name)
            .map(|s| s.name.as_str())
            .collect();

        print!("   {} ({} keys)", name.bright_blue().bold(), keys.len());
        if used_by.is_empty() {
            println!();
        } else {
            println!(" {}", format!("← {}", used_by.join(", ")).green());
        }
        for key in keys {
            println!("      {}", key);
        }
    }
    println!();
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
