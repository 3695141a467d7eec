//! Header resolution for the cell count source file.

use csv::StringRecord;

use cyto_model::Population;

use crate::error::{ImportError, Result};

pub const PROJECT: &str = "project";
pub const SUBJECT: &str = "subject";
pub const AGE: &str = "age";
pub const SEX: &str = "sex";
pub const TREATMENT: &str = "treatment";
pub const RESPONSE: &str = "response";
pub const SAMPLE: &str = "sample";
pub const SAMPLE_TYPE: &str = "sample_type";
pub const TIME_FROM_TREATMENT_START: &str = "time_from_treatment_start";

/// Every column the importer reads. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    PROJECT,
    SUBJECT,
    AGE,
    SEX,
    TREATMENT,
    RESPONSE,
    SAMPLE,
    SAMPLE_TYPE,
    TIME_FROM_TREATMENT_START,
    "b_cell",
    "cd8_t_cell",
    "cd4_t_cell",
    "nk_cell",
    "monocyte",
];

pub(crate) fn normalize_header(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}')
}

/// Positions of the required columns within a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    pub project: usize,
    pub subject: usize,
    pub age: usize,
    pub sex: usize,
    pub treatment: usize,
    pub response: usize,
    pub sample: usize,
    pub sample_type: usize,
    pub time_from_treatment_start: usize,
    /// Indexed by [`Population::index`].
    pub counts: [usize; 5],
}

impl ColumnIndex {
    /// Locate every required column in the header row.
    pub fn resolve(headers: &StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers.iter().map(normalize_header).collect();
        let find = |column: &'static str| {
            names
                .iter()
                .position(|name| *name == column)
                .ok_or(ImportError::MissingColumn { column })
        };
        let project = find(PROJECT)?;
        let subject = find(SUBJECT)?;
        let age = find(AGE)?;
        let sex = find(SEX)?;
        let treatment = find(TREATMENT)?;
        let response = find(RESPONSE)?;
        let sample = find(SAMPLE)?;
        let sample_type = find(SAMPLE_TYPE)?;
        let time_from_treatment_start = find(TIME_FROM_TREATMENT_START)?;
        let mut counts = [0usize; 5];
        for population in Population::ALL {
            counts[population.index()] = find(population.as_str())?;
        }
        Ok(Self {
            project,
            subject,
            age,
            sex,
            treatment,
            response,
            sample,
            sample_type,
            time_from_treatment_start,
            counts,
        })
    }

    pub fn count(&self, population: Population) -> usize {
        self.counts[population.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_reordered_headers_with_extras() {
        let mut headers: Vec<&str> = REQUIRED_COLUMNS.iter().rev().copied().collect();
        headers.insert(3, "notes");
        let record = StringRecord::from(headers);
        let index = ColumnIndex::resolve(&record).unwrap();
        assert_eq!(index.count(Population::Monocyte), 0);
        assert_eq!(index.project, 14);
        assert_eq!(index.count(Population::NkCell), 1);
        assert_eq!(index.count(Population::Cd4TCell), 2);
        assert_eq!(index.count(Population::Cd8TCell), 4);
    }

    #[test]
    fn reports_first_missing_column() {
        let headers: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| *name != "nk_cell")
            .collect();
        let err = ColumnIndex::resolve(&StringRecord::from(headers)).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn { column: "nk_cell" }));
    }

    #[test]
    fn strips_byte_order_mark() {
        let mut headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect();
        headers[0] = format!("\u{feff}{}", headers[0]);
        let index = ColumnIndex::resolve(&StringRecord::from(headers)).unwrap();
        assert_eq!(index.project, 0);
    }
}
