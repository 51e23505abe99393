use thiserror::Error;

pub type DcfResult<T> = Result<T, DcfError>;

#[derive(Error, Debug)]
pub enum DcfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported input file type '{extension}': {path}")]
    UnsupportedInput { path: String, extension: String },

    #[error("Input file is empty: {0}")]
    EmptyInput(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Sheet '{sheet}' not found. Available: {available:?}")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Field '{field}' not found in {scope}. Available: {available:?}")]
    FieldNotFound {
        field: String,
        scope: String,
        available: Vec<String>,
    },

    #[error("Invalid period domain: {0}")]
    Periods(String),

    #[error("Schedule definition error: {0}")]
    Definition(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported output path (expected .xlsx): {0}")]
    UnsupportedOutput(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl DcfError {
    /// Valid alternatives carried by a reference error, if any
    pub fn alternatives(&self) -> Option<&[String]> {
        match self {
            DcfError::SheetNotFound { available, .. }
            | DcfError::FieldNotFound { available, .. } => Some(available),
            _ => None,
        }
    }
}
