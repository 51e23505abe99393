use anyhow::Context;
use clap::{Parser, Subcommand};
use dcf_forge::cli::{self, LoadOptions};
use dcf_forge::core::FieldRef;
use dcf_forge::schedule::SourceLayout;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dcf-forge")]
#[command(about = "Extract financial schedules from spreadsheets and render a DCF report.")]
#[command(long_about = "DCF Forge - financial schedule extraction and report rendering

Reads positional spreadsheet data, resolves it into hierarchical schedules of
year-indexed series, and writes every schedule onto one formatted worksheet.

INPUT LAYOUTS:
  fixed   - one grid, every period in a known column (CSV default)
  sheets  - one sheet per schedule, years in header row 1 (workbook default)
  *.yaml  - a model snapshot written by 'summary'

COMMANDS:
  export   - Render all schedules to a formatted .xlsx report
  show     - Print schedules as console tables
  resolve  - Look up a single series
  summary  - Dump the model as nested YAML
  sheets   - List source sheets and their row keys

EXAMPLES:
  dcf-forge export ypf.xlsx -o report.xlsx
  dcf-forge export model.csv -o report.xlsx --definitions book.yaml
  dcf-forge resolve ypf.xlsx revenue --sheet \"Income Statement\" --json
  dcf-forge summary ypf.xlsx -o snapshot.yaml")]
#[command(version)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads a model
#[derive(clap::Args)]
struct SourceArgs {
    /// Schedule definitions YAML (defaults to the bundled YPF book)
    #[arg(short, long, env = "DCF_FORGE_DEFINITIONS")]
    definitions: Option<PathBuf>,

    /// Input layout: auto, fixed or sheets
    #[arg(short, long, default_value = "auto")]
    layout: SourceLayout,
}

impl From<SourceArgs> for LoadOptions {
    fn from(args: SourceArgs) -> Self {
        LoadOptions {
            definitions: args.definitions,
            layout: args.layout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Render every schedule onto one formatted worksheet.

Schedules are stacked vertically in definition order. Each block has a
company line, a centered title, a 'Projected' banner, period headers
(2020A ... 2034E) and one row per line item. Historical figures are blue.

STYLE:
  --style takes a YAML file overriding any LayoutConfig field, e.g.

  font_name: Arial
  period_column_width: 9.0
  percent_format: \"0.0%\"")]
    /// Export schedules to an Excel .xlsx report
    Export {
        /// Input workbook, CSV or YAML snapshot
        input: PathBuf,

        /// Output .xlsx file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Report style YAML
        #[arg(short, long)]
        style: Option<PathBuf>,

        /// Company name printed above each schedule title
        #[arg(short, long)]
        company: Option<String>,
    },

    /// Print schedules as console tables
    Show {
        /// Input workbook, CSV or YAML snapshot
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Only this schedule
        #[arg(long)]
        schedule: Option<String>,
    },

    #[command(long_about = "Resolve a single field reference against the input.

Give either a row key (looked up in the sheet's key column) or --row N.
In the per-sheet layout --sheet selects the sheet.")]
    /// Resolve a single field to a year-indexed series
    Resolve {
        /// Input workbook or CSV
        input: PathBuf,

        /// Row key
        #[arg(required_unless_present = "row", conflicts_with = "row")]
        field: Option<String>,

        /// Absolute row number (1-indexed)
        #[arg(long)]
        row: Option<u32>,

        /// Sheet name (per-sheet layout)
        #[arg(long)]
        sheet: Option<String>,

        /// Print the series as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Dump the model as nested YAML
    Summary {
        /// Input workbook, CSV or YAML snapshot
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List source sheets and their row keys
    Sheets {
        /// Input workbook or CSV
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "dcf_forge=debug"
    } else {
        "dcf_forge=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Export {
            input,
            output,
            source,
            style,
            company,
        } => cli::export(
            input.clone(),
            output,
            &source.into(),
            style,
            company,
            cli.verbose,
        )
        .with_context(|| format!("export of {} failed", input.display())),

        Commands::Show {
            input,
            source,
            schedule,
        } => cli::show(input.clone(), &source.into(), schedule)
            .with_context(|| format!("could not show {}", input.display())),

        Commands::Resolve {
            input,
            field,
            row,
            sheet,
            json,
            source,
        } => {
            let field = match (row, field) {
                (Some(row), _) => FieldRef::Row(row),
                (None, Some(key)) => FieldRef::Key(key),
                (None, None) => anyhow::bail!("either a field key or --row is required"),
            };
            cli::resolve(input.clone(), &source.into(), sheet, field, json)
                .with_context(|| format!("could not resolve against {}", input.display()))
        }

        Commands::Summary {
            input,
            output,
            source,
        } => cli::summary(input.clone(), &source.into(), output)
            .with_context(|| format!("could not summarize {}", input.display())),

        Commands::Sheets { input, source } => cli::sheets(input.clone(), &source.into())
            .with_context(|| format!("could not list sheets of {}", input.display())),
    }
}
