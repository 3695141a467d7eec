//! End-to-end tests: import a synthetic file, then run every analysis stage.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use cyto_analysis::{
    TestMethod, analyze_response_effects, baseline_summary, generate_frequency_summary,
};
use cyto_ingest::import_cell_counts;
use cyto_model::{ImportOptions, Population, StoreOptions};
use tempfile::{TempDir, tempdir};

const HEADER: &str = "project,subject,condition,age,sex,treatment,response,sample,sample_type,time_from_treatment_start,b_cell,cd8_t_cell,cd4_t_cell,nk_cell,monocyte";

/// (project, subject, sex, treatment, response, sample, sample_type, time, b_cell)
const ROWS: [(&str, &str, &str, &str, &str, &str, &str, &str, u32); 8] = [
    ("prj1", "sbj1", "M", "miraclib", "yes", "s1", "PBMC", "0", 40),
    ("prj1", "sbj2", "F", "miraclib", "no", "s2", "PBMC", "0", 10),
    ("prj2", "sbj3", "M", "miraclib", "yes", "s3", "PBMC", "0", 41),
    ("prj2", "sbj3", "M", "miraclib", "yes", "s4", "PBMC", "7", 42),
    ("prj2", "sbj4", "F", "phauximab", "no", "s5", "PBMC", "0", 30),
    ("prj3", "sbj5", "F", "miraclib", "no", "s6", "WB", "0", 30),
    ("prj3", "sbj6", "M", "miraclib", "no", "s7", "PBMC", "0.0", 11),
    ("prj3", "sbj7", "F", "miraclib", "no", "s8", "PBMC", "0", 12),
];

fn setup() -> (TempDir, PathBuf) {
    let dir = tempdir().expect("tempdir");
    let csv = dir.path().join("cell-count.csv");
    let mut contents = String::from(HEADER);
    for (project, subject, sex, treatment, response, sample, sample_type, time, b_cell) in ROWS {
        let monocyte = 100 - b_cell - 50;
        contents.push_str(&format!(
            "\n{project},{subject},melanoma,55,{sex},{treatment},{response},{sample},{sample_type},{time},{b_cell},20,20,10,{monocyte}"
        ));
    }
    contents.push('\n');
    fs::write(&csv, contents).expect("write csv");

    let db = dir.path().join("cell-count.db");
    import_cell_counts(&csv, &db, &StoreOptions::default(), &ImportOptions::default())
        .expect("import");
    (dir, db)
}

#[test]
fn frequency_summary_covers_every_sample() {
    let (_dir, db) = setup();
    let table = generate_frequency_summary(&db, &StoreOptions::default()).expect("summary");

    assert_eq!(table.len(), ROWS.len() * 5);
    assert_eq!(table.sample_count(), ROWS.len());
    let first: Vec<_> = table.for_sample("s1").collect();
    assert_eq!(first.len(), 5);
    assert_eq!(first[0].population, Population::BCell);
    assert_eq!(first[0].total_count, 100);
    assert_eq!(first[0].percentage, 40.0);
    assert_eq!(first[4].percentage, 10.0);
}

#[test]
fn response_analysis_uses_cohort_only() {
    let (_dir, db) = setup();
    let options = StoreOptions::default();
    let table = generate_frequency_summary(&db, &options).expect("summary");
    let analysis = analyze_response_effects(&table, &db, &options).expect("analysis");

    // s1, s2, s3, s4, s7, s8 are PBMC + miraclib.
    assert_eq!(analysis.cohort_rows, 30);
    assert_eq!(analysis.comparisons.len(), 5);

    let b_cell = &analysis.comparisons[0];
    assert_eq!(b_cell.population, Population::BCell);
    assert_eq!(b_cell.responders.values, vec![40.0, 41.0, 42.0]);
    assert_eq!(b_cell.non_responders.values, vec![10.0, 11.0, 12.0]);
    let test = b_cell.test.as_ref().expect("both groups present");
    assert_eq!(test.method, TestMethod::Exact);
    assert!((test.p_value - 0.1).abs() < 1e-12);

    // Three against three cannot reach p < 0.05.
    assert!(analysis.significant.is_empty());
}

#[test]
fn baseline_summary_matches_hand_counts() {
    let (_dir, db) = setup();
    let summary = baseline_summary(&db, &StoreOptions::default()).expect("baseline");

    assert_eq!(
        summary.samples_per_project,
        BTreeMap::from([
            ("prj1".to_string(), 2),
            ("prj2".to_string(), 1),
            ("prj3".to_string(), 1),
        ])
    );
    assert_eq!(summary.responders, 2);
    assert_eq!(summary.non_responders, 2);
    assert_eq!(
        summary.sex_distribution,
        BTreeMap::from([("F".to_string(), 2), ("M".to_string(), 2)])
    );
}

#[test]
fn analysis_serializes_for_collaborators() {
    let (_dir, db) = setup();
    let options = StoreOptions::default();
    let table = generate_frequency_summary(&db, &options).expect("summary");
    let analysis = analyze_response_effects(&table, &db, &options).expect("analysis");

    let json = serde_json::to_value(&analysis).expect("serialize analysis");
    assert_eq!(json["comparisons"][0]["population"], "b_cell");
    assert_eq!(json["comparisons"][0]["test"]["method"], "exact");
    assert!(json["significant"].as_array().unwrap().is_empty());
}
