//! Derived tables produced by the analysis stages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::population::Population;

/// Relative frequency of one population within one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub sample: String,
    pub total_count: u64,
    pub population: Population,
    pub count: u32,
    /// Percentage of the sample total, rounded to two decimals.
    pub percentage: f64,
}

/// Flat frequency table: five rows per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    pub fn new(rows: Vec<FrequencyRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequencyRow> {
        self.rows.iter()
    }

    /// Number of distinct samples, assuming five contiguous rows each.
    pub fn sample_count(&self) -> usize {
        self.rows.len() / Population::ALL.len()
    }

    /// Rows for a single sample code.
    pub fn for_sample<'a>(&'a self, sample: &'a str) -> impl Iterator<Item = &'a FrequencyRow> {
        self.rows.iter().filter(move |row| row.sample == sample)
    }
}

impl<'a> IntoIterator for &'a FrequencyTable {
    type Item = &'a FrequencyRow;
    type IntoIter = std::slice::Iter<'a, FrequencyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Descriptive counts for the baseline cohort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub samples_per_project: BTreeMap<String, usize>,
    pub responders: usize,
    pub non_responders: usize,
    pub sex_distribution: BTreeMap<String, usize>,
}

impl BaselineSummary {
    pub fn total_samples(&self) -> usize {
        self.samples_per_project.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sample: &str, population: Population) -> FrequencyRow {
        FrequencyRow {
            sample: sample.to_string(),
            total_count: 0,
            population,
            count: 0,
            percentage: 0.0,
        }
    }

    #[test]
    fn table_helpers() {
        let rows: Vec<FrequencyRow> = ["s1", "s2"]
            .iter()
            .flat_map(|sample| Population::ALL.iter().map(|p| row(sample, *p)))
            .collect();
        let table = FrequencyTable::new(rows);
        assert_eq!(table.len(), 10);
        assert_eq!(table.sample_count(), 2);
        assert_eq!(table.for_sample("s2").count(), 5);
    }

    #[test]
    fn frequency_table_serializes_as_array() {
        let table = FrequencyTable::new(vec![row("s1", Population::BCell)]);
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["population"], "b_cell");
    }
}
