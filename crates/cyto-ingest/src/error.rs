//! Import error types.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use cyto_store::StoreError;

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The source file could not be opened.
    #[error("failed to open source file: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed CSV (unequal row lengths, invalid UTF-8, I/O failure).
    #[error("failed to read source records")]
    Csv(#[from] csv::Error),

    /// A required header is absent.
    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    /// A numeric field did not parse as an integer.
    #[error("line {line}: column '{column}' has non-integer value '{value}'")]
    InvalidInteger {
        line: u64,
        column: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Failure reported by the store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
