//! Statistical routines.

pub mod describe;
pub mod mann_whitney;

pub use describe::BoxStats;
pub use mann_whitney::{MannWhitneyResult, TestMethod, mann_whitney_u};
