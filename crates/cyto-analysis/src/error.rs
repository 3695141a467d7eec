//! Analysis error types.

use thiserror::Error;

use cyto_store::StoreError;

/// Errors raised by statistical routines called directly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("{group} group is empty")]
    EmptyGroup { group: &'static str },

    #[error("{group} group contains a non-finite value")]
    NonFinite { group: &'static str },

    #[error("failed to build reference distribution: {0}")]
    Distribution(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
