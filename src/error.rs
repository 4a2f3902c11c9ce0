//! Error types for loading and querying a WEO dataset.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the source table or answering a query.
#[derive(Debug, Error)]
pub enum WeoError {
    // === Load errors ===
    /// Source file does not exist.
    #[error("WEO source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Source file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from a caller-supplied reader failed.
    #[error("failed to read WEO source: {0}")]
    Io(#[from] std::io::Error),

    /// Source is not a well-formed delimited table.
    #[error("failed to parse WEO table: {source}")]
    Parse {
        #[source]
        source: csv::Error,
    },

    /// Source has no header row.
    #[error("WEO source is empty")]
    EmptySource,

    /// The configured series horizon cannot be turned into year-end dates.
    #[error("latest year {year} is outside the supported range {min}..={max}")]
    InvalidHorizon { year: i32, min: i32, max: i32 },

    /// A column every WEO file carries is missing from the header.
    #[error("required column '{column}' not found in WEO header")]
    MissingColumn { column: String },

    // === Query errors ===
    /// Requested unit is not reported for the requested indicator.
    #[error("unit must be one of {valid:?} for '{indicator}', provided: '{unit}'")]
    InvalidUnit {
        indicator: String,
        unit: String,
        valid: Vec<String>,
    },

    /// Country name lookup matched nothing.
    #[error("no country matched '{query}'")]
    CountryNotFound { query: String },

    /// Year lies outside the series date window.
    #[error("year {year} is outside the series window {first}..={last}")]
    YearOutOfRange { year: i32, first: i32, last: i32 },

    /// No row carries the given WEO subject code.
    #[error("unknown WEO subject code '{code}'")]
    UnknownSubjectCode { code: String },

    // === Interop ===
    #[error("failed to build Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl WeoError {
    /// Whether the error was raised while constructing the dataset.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileRead { .. }
                | Self::Io(_)
                | Self::Parse { .. }
                | Self::EmptySource
                | Self::MissingColumn { .. }
                | Self::InvalidHorizon { .. }
        )
    }
}

impl From<csv::Error> for WeoError {
    fn from(source: csv::Error) -> Self {
        Self::Parse { source }
    }
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, WeoError>;
