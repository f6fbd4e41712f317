use std::path::PathBuf;

use thiserror::Error;

/// Every way loading an incident dataset can fail.
///
/// The loader reports all of them the same way (error message plus empty
/// dataset); the variants exist for logs and for `try_load` callers.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed CSV: line {line} has {found} fields, header has {expected}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("no columns to parse from file")]
    EmptyInput,

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON input must be an array of objects ({0})")]
    InvalidJson(String),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{column}'")]
    MissingColumn { column: String },
}

pub type Result<T, E = DataLoadError> = std::result::Result<T, E>;
