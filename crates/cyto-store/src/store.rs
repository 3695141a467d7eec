//! SQLite-backed cell count store.
//!
//! A [`CellStore`] owns exactly one connection. Callers open a store per
//! operation and drop it when done; the connection is closed on every exit
//! path, including early returns through `?`.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use cyto_model::{
    BaselineRow, CohortFilter, PersonRecord, PopulationCounts, SampleCounts, SampleMetadata,
    SampleRecord, StoreOptions, StoredPerson, StoredSample,
};

use crate::batch::ImportBatch;
use crate::error::{Result, StoreError};
use crate::schema;

/// Columns holding the five population counts, in reporting order.
const COUNT_COLUMNS: &str = "b_cell, cd8_t_cell, cd4_t_cell, nk_cell, monocyte";

/// Connection to a cell count database.
#[derive(Debug)]
pub struct CellStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl CellStore {
    /// Open (or create) a store at the given path and apply the schema.
    pub fn open(path: &Path, options: &StoreOptions) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(options.busy_timeout)
            .map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.initialize()?;
        debug!(path = %path.display(), "opened cell store");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(schema::PRAGMAS_SQL)?;
        self.conn.execute_batch(schema::SCHEMA_SQL)?;
        Ok(())
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Start a write transaction for a batch of imported records.
    pub fn begin_batch(&mut self) -> Result<ImportBatch<'_>> {
        let tx = self.conn.transaction()?;
        Ok(ImportBatch::new(tx))
    }

    /// Every sample's code and counts, in enumeration (id) order.
    pub fn sample_counts(&self) -> Result<Vec<SampleCounts>> {
        let sql = format!("SELECT sample_id, {COUNT_COLUMNS} FROM samples ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(SampleCounts {
                sample: row.get(0)?,
                counts: counts_from_row(row, 1)?,
            })
        })?;
        let samples = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(sample_count = samples.len(), "loaded sample counts");
        Ok(samples)
    }

    /// Response, sample type and treatment for every sample.
    pub fn sample_metadata(&self) -> Result<Vec<SampleMetadata>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.sample_id, p.response, s.sample_type, p.treatment
             FROM samples s
             JOIN people p ON s.people_id = p.id
             ORDER BY s.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SampleMetadata {
                sample: row.get(0)?,
                response: row.get(1)?,
                sample_type: row.get(2)?,
                treatment: row.get(3)?,
            })
        })?;
        let metadata = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(sample_count = metadata.len(), "loaded sample metadata");
        Ok(metadata)
    }

    /// Project, response and sex for every sample matching the filter.
    pub fn baseline_cohort(&self, filter: &CohortFilter) -> Result<Vec<BaselineRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT pr.project, p.response, p.sex
             FROM samples s
             JOIN people p ON s.people_id = p.id
             JOIN projects pr ON p.project_id = pr.id
             WHERE s.sample_type = ?1
               AND p.treatment = ?2
               AND (?3 IS NULL OR s.time_from_treatment_start = ?3)
             ORDER BY s.id",
        )?;
        let rows = stmt.query_map(
            params![
                filter.sample_type,
                filter.treatment,
                filter.time_from_treatment_start
            ],
            |row| {
                Ok(BaselineRow {
                    project: row.get(0)?,
                    response: row.get(1)?,
                    sex: row.get(2)?,
                })
            },
        )?;
        let cohort = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(row_count = cohort.len(), "loaded cohort rows");
        Ok(cohort)
    }

    pub fn project_count(&self) -> Result<usize> {
        self.table_count("projects")
    }

    pub fn person_count(&self) -> Result<usize> {
        self.table_count("people")
    }

    pub fn sample_count(&self) -> Result<usize> {
        self.table_count("samples")
    }

    fn table_count(&self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Look up a subject by code.
    pub fn find_person(&self, subject: &str) -> Result<Option<StoredPerson>> {
        let person = self
            .conn
            .query_row(
                "SELECT p.id, pr.project, p.subject, p.age, p.sex, p.treatment, p.response
                 FROM people p
                 JOIN projects pr ON p.project_id = pr.id
                 WHERE p.subject = ?1",
                params![subject],
                |row| {
                    Ok(StoredPerson {
                        id: row.get(0)?,
                        project: row.get(1)?,
                        record: PersonRecord {
                            subject: row.get(2)?,
                            age: row.get(3)?,
                            sex: row.get(4)?,
                            treatment: row.get(5)?,
                            response: row.get(6)?,
                        },
                    })
                },
            )
            .optional()?;
        Ok(person)
    }

    /// Look up a sample by code.
    pub fn find_sample(&self, sample: &str) -> Result<Option<StoredSample>> {
        let sql = format!(
            "SELECT s.id, p.subject, s.sample_id, s.sample_type, s.time_from_treatment_start,
                    {COUNT_COLUMNS}
             FROM samples s
             JOIN people p ON s.people_id = p.id
             WHERE s.sample_id = ?1"
        );
        let found = self
            .conn
            .query_row(&sql, params![sample], |row| {
                Ok(StoredSample {
                    id: row.get(0)?,
                    subject: row.get(1)?,
                    record: SampleRecord {
                        sample: row.get(2)?,
                        sample_type: row.get(3)?,
                        time_from_treatment_start: row.get(4)?,
                        counts: counts_from_row(row, 5)?,
                    },
                })
            })
            .optional()?;
        Ok(found)
    }
}

/// Read the five count columns starting at `offset`.
fn counts_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<PopulationCounts> {
    Ok(PopulationCounts::new(
        row.get(offset)?,
        row.get(offset + 1)?,
        row.get(offset + 2)?,
        row.get(offset + 3)?,
        row.get(offset + 4)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyto_model::{CellCountRecord, Population};

    fn record(project: &str, subject: &str, sample: &str, response: &str) -> CellCountRecord {
        CellCountRecord {
            project: project.to_string(),
            person: PersonRecord {
                subject: subject.to_string(),
                age: 60,
                sex: "F".to_string(),
                treatment: "miraclib".to_string(),
                response: response.to_string(),
            },
            sample: SampleRecord {
                sample: sample.to_string(),
                sample_type: "PBMC".to_string(),
                time_from_treatment_start: "0".to_string(),
                counts: PopulationCounts::new(1, 2, 3, 4, 5),
            },
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let store = CellStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.sample_count().unwrap(), 0);
        assert!(store.path().is_none());
    }

    #[test]
    fn insert_and_read_back() {
        let mut store = CellStore::open_in_memory().unwrap();
        let mut batch = store.begin_batch().unwrap();
        batch.insert_record(&record("prj1", "sbj1", "s1", "yes")).unwrap();
        batch.insert_record(&record("prj1", "sbj2", "s2", "no")).unwrap();
        assert_eq!(batch.commit().unwrap(), 2);

        assert_eq!(store.project_count().unwrap(), 1);
        assert_eq!(store.person_count().unwrap(), 2);
        let counts = store.sample_counts().unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].sample, "s1");
        assert_eq!(counts[0].counts.get(Population::Monocyte), 5);

        let metadata = store.sample_metadata().unwrap();
        assert_eq!(metadata[1].response, "no");
        assert_eq!(metadata[1].treatment, "miraclib");
    }

    #[test]
    fn uncommitted_batch_is_discarded() {
        let mut store = CellStore::open_in_memory().unwrap();
        {
            let mut batch = store.begin_batch().unwrap();
            batch.insert_record(&record("prj1", "sbj1", "s1", "yes")).unwrap();
        }
        assert_eq!(store.sample_count().unwrap(), 0);
        assert_eq!(store.project_count().unwrap(), 0);
    }

    #[test]
    fn find_missing_returns_none() {
        let store = CellStore::open_in_memory().unwrap();
        assert!(store.find_person("nobody").unwrap().is_none());
        assert!(store.find_sample("nothing").unwrap().is_none());
    }
}
