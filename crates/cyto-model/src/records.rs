//! Row-level types exchanged between the importer, the store and the
//! analysis stages.

use serde::{Deserialize, Serialize};

use crate::population::PopulationCounts;

/// Subject attributes written on first encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub subject: String,
    pub age: i64,
    pub sex: String,
    pub treatment: String,
    pub response: String,
}

/// Sample attributes written on every import of the sample code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub sample: String,
    pub sample_type: String,
    /// Free-form offset text; baseline is the literal `"0"`.
    pub time_from_treatment_start: String,
    pub counts: PopulationCounts,
}

/// One fully typed row of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCountRecord {
    pub project: String,
    pub person: PersonRecord,
    pub sample: SampleRecord,
}

/// A person as persisted, joined with its project name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPerson {
    pub id: i64,
    pub project: String,
    pub record: PersonRecord,
}

/// A sample as persisted, joined with its subject code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSample {
    pub id: i64,
    pub subject: String,
    pub record: SampleRecord,
}

/// Sample code with its population counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCounts {
    pub sample: String,
    pub counts: PopulationCounts,
}

/// Per-sample attributes used to partition frequencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleMetadata {
    pub sample: String,
    pub response: String,
    pub sample_type: String,
    pub treatment: String,
}

/// One baseline cohort row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRow {
    pub project: String,
    pub response: String,
    pub sex: String,
}
