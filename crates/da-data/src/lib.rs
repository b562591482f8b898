//! Data loading and analysis for the analytics pipeline
//!
//! Turns raw CSV text into a [`Dataset`](da_core::Dataset), classifies its
//! columns, computes per-column statistics, and prepares derived data
//! (histograms, chart series, exports) for presentation collaborators.

pub mod batch;
pub mod charts;
pub mod config;
pub mod export;
pub mod insights;
pub mod schema;
pub mod sources;
pub mod stats;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use config::{AnalysisConfig, Config, ViewConfig};
pub use schema::{ColumnClassifier, ColumnKind};
pub use sources::{parse_csv, parse_csv_line, CsvSource};
pub use stats::{analyze, AnalysisSummary, Bin, ColumnSummary};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),

    #[error("CSV writing error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No data to export")]
    EmptyDataset,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

impl From<ArrowError> for DataError {
    fn from(error: ArrowError) -> Self {
        DataError::Arrow(error)
    }
}

/// Result alias for data operations
pub type Result<T> = std::result::Result<T, DataError>;
