//! Per-sample relative frequency of each cell population.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span};

use cyto_model::{FrequencyRow, FrequencyTable, SampleCounts, StoreOptions};
use cyto_store::CellStore;

use crate::error::Result;

/// Round to two decimal places on the exact decimal expansion of `value`,
/// with ties to even (`3.125` becomes `3.12`, `2.675` becomes `2.67`).
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Percentage of `total` contributed by `count`; zero when `total` is zero.
pub fn percentage(count: u32, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(f64::from(count) / total as f64 * 100.0)
}

/// Five frequency rows for one sample, in population order.
pub fn sample_frequencies(sample: &SampleCounts) -> Vec<FrequencyRow> {
    let total = sample.counts.total();
    sample
        .counts
        .iter()
        .map(|(population, count)| FrequencyRow {
            sample: sample.sample.clone(),
            total_count: total,
            population,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Frequency table for samples in the given order.
pub fn frequency_table(samples: &[SampleCounts]) -> FrequencyTable {
    FrequencyTable::new(samples.iter().flat_map(sample_frequencies).collect())
}

/// Summarize every sample in an open store.
pub fn summarize_store(store: &CellStore) -> Result<FrequencyTable> {
    let samples = store.sample_counts()?;
    Ok(frequency_table(&samples))
}

/// Open the store, summarize it and close it again.
pub fn generate_frequency_summary(
    db_path: &Path,
    store_options: &StoreOptions,
) -> Result<FrequencyTable> {
    let span = info_span!("frequency_summary", store = %db_path.display());
    let _guard = span.enter();
    let start = Instant::now();
    let store = CellStore::open(db_path, store_options)?;
    let table = summarize_store(&store)?;
    info!(
        samples = table.sample_count(),
        rows = table.len(),
        duration_ms = start.elapsed().as_millis(),
        "frequency summary complete"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyto_model::{Population, PopulationCounts};
    use proptest::prelude::*;

    fn sample(code: &str, counts: PopulationCounts) -> SampleCounts {
        SampleCounts {
            sample: code.to_string(),
            counts,
        }
    }

    #[test]
    fn worked_example() {
        let rows = sample_frequencies(&sample("s1", PopulationCounts::new(10, 20, 30, 0, 0)));
        let percentages: Vec<f64> = rows.iter().map(|row| row.percentage).collect();
        assert_eq!(percentages, vec![16.67, 33.33, 50.0, 0.0, 0.0]);
        assert!(rows.iter().all(|row| row.total_count == 60));
        assert_eq!(rows[2].population, Population::Cd4TCell);
        assert_eq!(rows[2].count, 30);
    }

    #[test]
    fn exact_halves_round_to_even() {
        assert_eq!(percentage(1, 32), 3.12);
        assert_eq!(percentage(5, 32), 15.62);
        assert_eq!(percentage(3, 32), 9.38);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(16.666_666), 16.67);
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let rows = sample_frequencies(&sample("empty", PopulationCounts::default()));
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row.percentage == 0.0));
        assert!(rows.iter().all(|row| row.total_count == 0));
    }

    #[test]
    fn table_keeps_sample_order() {
        let table = frequency_table(&[
            sample("b", PopulationCounts::new(1, 1, 1, 1, 1)),
            sample("a", PopulationCounts::new(2, 2, 2, 2, 2)),
        ]);
        assert_eq!(table.len(), 10);
        let samples: Vec<&str> = table.iter().map(|row| row.sample.as_str()).collect();
        assert_eq!(&samples[..5], &["b"; 5]);
        assert_eq!(&samples[5..], &["a"; 5]);
        let populations: Vec<Population> =
            table.iter().take(5).map(|row| row.population).collect();
        assert_eq!(populations, Population::ALL.to_vec());
    }

    proptest! {
        #[test]
        fn percentages_sum_to_one_hundred(
            counts in prop::array::uniform5(0u32..1_000_000),
        ) {
            let counts = PopulationCounts::new(counts[0], counts[1], counts[2], counts[3], counts[4]);
            prop_assume!(counts.total() > 0);
            let rows = sample_frequencies(&sample("s", counts));
            let sum: f64 = rows.iter().map(|row| row.percentage).sum();
            prop_assert!((sum - 100.0).abs() <= 0.05 + 1e-9, "sum was {}", sum);
        }
    }
}
