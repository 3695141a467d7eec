//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or configured.
    #[error("failed to open store at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Constraint violation, I/O or query failure reported by SQLite.
    #[error("storage engine error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
