//! Analysis stages over the cell store.
//!
//! - [`frequency`]: percentage of each population per sample
//! - [`response`]: responder versus non-responder comparison per population
//! - [`baseline`]: counts for the baseline cohort
//!
//! Every entry point that takes a database path opens its own store and
//! closes it before returning. Nothing is cached between calls.

pub mod baseline;
mod error;
pub mod frequency;
pub mod response;
pub mod stats;

pub use baseline::{baseline_summary, summarize_rows};
pub use error::{AnalysisError, Result, StatsError};
pub use frequency::{
    frequency_table, generate_frequency_summary, percentage, sample_frequencies, summarize_store,
};
pub use response::{
    GroupDistribution, PopulationComparison, ResponseAnalysis, SignificantPopulation,
    analyze_response_effects, analyze_with_metadata,
};
pub use stats::{BoxStats, MannWhitneyResult, TestMethod, mann_whitney_u};
