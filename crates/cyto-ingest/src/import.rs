//! Batched import of cell count records into the store.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, info_span};

use cyto_model::{CellCountRecord, ImportOptions, StoreOptions};
use cyto_store::CellStore;

use crate::error::Result;
use crate::reader::CellCountReader;

/// Outcome of a completed import run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Records read from the source and written to the store.
    pub records: usize,
    /// Transactions committed, including the final one.
    pub commits: usize,
    /// Row counts in the store after the run.
    pub projects: usize,
    pub people: usize,
    pub samples: usize,
    pub duration: Duration,
}

/// Import a CSV file into the store at `db_path`.
///
/// The source is opened and its header checked before the store, so a missing
/// file or column leaves no database behind. The store is closed on return.
pub fn import_cell_counts(
    csv_path: &Path,
    db_path: &Path,
    store_options: &StoreOptions,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let span = info_span!(
        "import",
        source = %csv_path.display(),
        store = %db_path.display(),
        batch_size = options.batch_size
    );
    let _guard = span.enter();
    let reader = CellCountReader::from_path(csv_path)?;
    let mut store = CellStore::open(db_path, store_options)?;
    import_records(&mut store, reader, options)
}

/// Write records into an open store, committing every `batch_size` records
/// and once more at the end.
///
/// The first failing record aborts the run. Earlier batches stay committed;
/// the open batch is rolled back.
pub fn import_records<I>(
    store: &mut CellStore,
    records: I,
    options: &ImportOptions,
) -> Result<ImportReport>
where
    I: IntoIterator<Item = Result<CellCountRecord>>,
{
    let start = Instant::now();
    let batch_size = options.batch_size.max(1);
    let mut report = ImportReport::default();

    let mut batch = store.begin_batch()?;
    for record in records {
        let record = record?;
        batch.insert_record(&record)?;
        report.records += 1;
        if batch.len() >= batch_size {
            batch.commit()?;
            report.commits += 1;
            info!(
                records = report.records,
                commits = report.commits,
                "committed batch"
            );
            batch = store.begin_batch()?;
        }
    }
    let tail = batch.commit()?;
    report.commits += 1;
    debug!(records = tail, "committed final batch");

    report.projects = store.project_count()?;
    report.people = store.person_count()?;
    report.samples = store.sample_count()?;
    report.duration = start.elapsed();
    info!(
        records = report.records,
        commits = report.commits,
        samples = report.samples,
        duration_ms = report.duration.as_millis(),
        "import complete"
    );
    Ok(report)
}
