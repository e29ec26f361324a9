use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Load errors – fatal at startup
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parquet error: {0}")]
    Parquet(String),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}, column '{column}': cannot parse '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Chart errors – local to a single render
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("unrecognized value '{value}' for control '{control}'")]
    UnknownSelection { control: String, value: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to finish CSV buffer: {0}")]
    Buffer(String),
}
