//! Fixed cohort definitions used by the analysis stages.
//!
//! Matching is exact text comparison. A time offset of `"0.0"` or
//! `"Day 0"` is not baseline.

use serde::{Deserialize, Serialize};

pub const PBMC: &str = "PBMC";
pub const MIRACLIB: &str = "miraclib";
pub const BASELINE_OFFSET: &str = "0";
pub const RESPONDER: &str = "yes";
pub const NON_RESPONDER: &str = "no";

/// Two-sided significance level for the responder comparison.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Sample selection criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortFilter {
    pub sample_type: String,
    pub treatment: String,
    /// When set, only samples with exactly this time offset match.
    pub time_from_treatment_start: Option<String>,
}

impl CohortFilter {
    /// PBMC samples from miraclib-treated subjects at any time point.
    pub fn response_cohort() -> Self {
        Self {
            sample_type: PBMC.to_string(),
            treatment: MIRACLIB.to_string(),
            time_from_treatment_start: None,
        }
    }

    /// PBMC samples from miraclib-treated subjects at baseline.
    pub fn baseline_cohort() -> Self {
        Self {
            time_from_treatment_start: Some(BASELINE_OFFSET.to_string()),
            ..Self::response_cohort()
        }
    }

    pub fn matches(&self, sample_type: &str, treatment: &str, time_offset: Option<&str>) -> bool {
        if sample_type != self.sample_type || treatment != self.treatment {
            return false;
        }
        match (&self.time_from_treatment_start, time_offset) {
            (None, _) => true,
            (Some(expected), Some(actual)) => expected == actual,
            (Some(_), None) => false,
        }
    }
}
