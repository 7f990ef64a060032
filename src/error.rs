use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("{file}: missing column '{column}'")]
    MissingColumn { file: String, column: String },

    #[error("{file}:{line}: unparseable date '{value}'")]
    BadDate {
        file: String,
        line: u64,
        value: String,
    },

    #[error("{file}:{line}: unparseable value '{value}'")]
    BadValue {
        file: String,
        line: u64,
        value: String,
    },

    #[error("No year is present in all four data sources")]
    EmptyJoin,

    #[error("Cannot log-scale {series}: value {value} in {year} is not positive")]
    NonPositiveSeries {
        series: String,
        year: i32,
        value: f64,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, WageError>;
