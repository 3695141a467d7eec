//! Responder versus non-responder comparison of population frequencies.
//!
//! The frequency table is joined with per-sample metadata, restricted to
//! the response cohort (PBMC samples, miraclib treatment), and each
//! population's percentages are compared between subjects with response
//! `"yes"` and `"no"` using a two-sided Mann–Whitney U test.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use cyto_model::cohort::{NON_RESPONDER, RESPONDER, SIGNIFICANCE_LEVEL};
use cyto_model::{CohortFilter, FrequencyTable, Population, SampleMetadata, StoreOptions};
use cyto_store::CellStore;

use crate::error::Result;
use crate::stats::{BoxStats, MannWhitneyResult, mann_whitney_u};

/// Percentages for one response group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDistribution {
    pub values: Vec<f64>,
    pub summary: Option<BoxStats>,
}

impl GroupDistribution {
    fn from_values(values: Vec<f64>) -> Self {
        let summary = BoxStats::from_values(&values);
        Self { values, summary }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Distributions and test outcome for one population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationComparison {
    pub population: Population,
    pub responders: GroupDistribution,
    pub non_responders: GroupDistribution,
    /// `None` when either group is empty.
    pub test: Option<MannWhitneyResult>,
}

impl PopulationComparison {
    pub fn is_significant(&self) -> bool {
        self.test
            .as_ref()
            .is_some_and(|test| test.is_significant(SIGNIFICANCE_LEVEL))
    }
}

/// A population whose groups differ at the significance level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignificantPopulation {
    pub population: Population,
    pub p_value: f64,
}

/// Full output of the responder comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseAnalysis {
    /// Frequency rows left after the join and cohort filter.
    pub cohort_rows: usize,
    /// One entry per population, in first-seen order.
    pub comparisons: Vec<PopulationComparison>,
    /// Populations with p below the significance level, in the same order.
    pub significant: Vec<SignificantPopulation>,
}

/// Join, filter and test using metadata already loaded.
pub fn analyze_with_metadata(
    table: &FrequencyTable,
    metadata: &[SampleMetadata],
    filter: &CohortFilter,
) -> Result<ResponseAnalysis> {
    let by_sample: HashMap<&str, &SampleMetadata> = metadata
        .iter()
        .map(|meta| (meta.sample.as_str(), meta))
        .collect();

    let mut order: Vec<Population> = Vec::new();
    let mut groups: HashMap<Population, (Vec<f64>, Vec<f64>)> = HashMap::new();
    let mut cohort_rows = 0usize;

    for row in table {
        let Some(meta) = by_sample.get(row.sample.as_str()) else {
            continue;
        };
        if !filter.matches(&meta.sample_type, &meta.treatment, None) {
            continue;
        }
        cohort_rows += 1;
        let entry = groups.entry(row.population).or_insert_with(|| {
            order.push(row.population);
            (Vec::new(), Vec::new())
        });
        match meta.response.as_str() {
            RESPONDER => entry.0.push(row.percentage),
            NON_RESPONDER => entry.1.push(row.percentage),
            _ => {}
        }
    }

    let mut analysis = ResponseAnalysis {
        cohort_rows,
        ..ResponseAnalysis::default()
    };
    for population in order {
        let (yes, no) = groups.remove(&population).unwrap_or_default();
        let test = if yes.is_empty() || no.is_empty() {
            debug!(%population, responders = yes.len(), non_responders = no.len(), "skipping test");
            None
        } else {
            let result = mann_whitney_u(&yes, &no)?;
            debug!(
                %population,
                u = result.u_statistic,
                p_value = result.p_value,
                method = ?result.method,
                "compared response groups"
            );
            Some(result)
        };
        let comparison = PopulationComparison {
            population,
            responders: GroupDistribution::from_values(yes),
            non_responders: GroupDistribution::from_values(no),
            test,
        };
        if let Some(test) = comparison.test.as_ref().filter(|_| comparison.is_significant()) {
            analysis.significant.push(SignificantPopulation {
                population,
                p_value: test.p_value,
            });
        }
        analysis.comparisons.push(comparison);
    }
    Ok(analysis)
}

/// Compare responders and non-responders using fresh store metadata.
pub fn analyze_response_effects(
    table: &FrequencyTable,
    db_path: &Path,
    store_options: &StoreOptions,
) -> Result<ResponseAnalysis> {
    let span = info_span!("response_analysis", store = %db_path.display());
    let _guard = span.enter();
    let start = Instant::now();
    let metadata = {
        let store = CellStore::open(db_path, store_options)?;
        store.sample_metadata()?
    };
    let analysis = analyze_with_metadata(table, &metadata, &CohortFilter::response_cohort())?;
    info!(
        cohort_rows = analysis.cohort_rows,
        populations = analysis.comparisons.len(),
        significant = analysis.significant.len(),
        duration_ms = start.elapsed().as_millis(),
        "response analysis complete"
    );
    Ok(analysis)
}
