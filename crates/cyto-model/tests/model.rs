//! Tests for cyto-model types.

use std::collections::BTreeMap;

use cyto_model::{BaselineSummary, CellCountRecord, PersonRecord, PopulationCounts, SampleRecord};

#[test]
fn baseline_summary_totals() {
    let summary = BaselineSummary {
        samples_per_project: BTreeMap::from([("prj1".to_string(), 3), ("prj3".to_string(), 2)]),
        responders: 3,
        non_responders: 2,
        sex_distribution: BTreeMap::from([("F".to_string(), 1), ("M".to_string(), 4)]),
    };
    assert_eq!(summary.total_samples(), 5);
}

#[test]
fn record_serializes() {
    let record = CellCountRecord {
        project: "prj1".to_string(),
        person: PersonRecord {
            subject: "sbj000".to_string(),
            age: 57,
            sex: "M".to_string(),
            treatment: "miraclib".to_string(),
            response: "no".to_string(),
        },
        sample: SampleRecord {
            sample: "sample00000".to_string(),
            sample_type: "PBMC".to_string(),
            time_from_treatment_start: "0".to_string(),
            counts: PopulationCounts::new(36000, 24000, 42000, 6000, 12000),
        },
    };
    let json = serde_json::to_string(&record).expect("serialize record");
    let round: CellCountRecord = serde_json::from_str(&json).expect("deserialize record");
    assert_eq!(round, record);
    assert_eq!(round.sample.counts.total(), 120000);
}
