//! Descriptive counts for the baseline cohort.
//!
//! Baseline means PBMC samples from miraclib-treated subjects whose time
//! offset is exactly the text `"0"`. Other encodings of day zero are not
//! matched.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, info_span};

use cyto_model::cohort::{NON_RESPONDER, RESPONDER};
use cyto_model::{BaselineRow, BaselineSummary, CohortFilter, StoreOptions};
use cyto_store::CellStore;

use crate::error::Result;

/// Tally cohort rows by project, response and sex.
pub fn summarize_rows(rows: &[BaselineRow]) -> BaselineSummary {
    let mut samples_per_project: BTreeMap<String, usize> = BTreeMap::new();
    let mut sex_distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut responders = 0usize;
    let mut non_responders = 0usize;
    for row in rows {
        *samples_per_project.entry(row.project.clone()).or_insert(0) += 1;
        *sex_distribution.entry(row.sex.clone()).or_insert(0) += 1;
        match row.response.as_str() {
            RESPONDER => responders += 1,
            NON_RESPONDER => non_responders += 1,
            _ => {}
        }
    }
    BaselineSummary {
        samples_per_project,
        responders,
        non_responders,
        sex_distribution,
    }
}

/// Open the store and summarize the baseline cohort.
pub fn baseline_summary(db_path: &Path, store_options: &StoreOptions) -> Result<BaselineSummary> {
    let span = info_span!("baseline_summary", store = %db_path.display());
    let _guard = span.enter();
    let rows = {
        let store = CellStore::open(db_path, store_options)?;
        store.baseline_cohort(&CohortFilter::baseline_cohort())?
    };
    let summary = summarize_rows(&rows);
    info!(
        samples = rows.len(),
        projects = summary.samples_per_project.len(),
        responders = summary.responders,
        non_responders = summary.non_responders,
        "baseline summary complete"
    );
    Ok(summary)
}
