//! Transactional writes for the importer.

use rusqlite::{Transaction, params};
use tracing::trace;

use cyto_model::{CellCountRecord, PersonId, PersonRecord, ProjectId, SampleRecord};

use crate::error::Result;

/// One open write transaction.
///
/// Dropping a batch without calling [`ImportBatch::commit`] rolls back
/// everything written through it.
pub struct ImportBatch<'conn> {
    tx: Transaction<'conn>,
    records: usize,
}

impl<'conn> ImportBatch<'conn> {
    pub(crate) fn new(tx: Transaction<'conn>) -> Self {
        Self { tx, records: 0 }
    }

    /// Insert the project if absent and return its id.
    pub fn ensure_project(&self, name: &str) -> Result<ProjectId> {
        self.tx
            .prepare_cached("INSERT OR IGNORE INTO projects (project) VALUES (?1)")?
            .execute(params![name])?;
        let id = self
            .tx
            .prepare_cached("SELECT id FROM projects WHERE project = ?1")?
            .query_row(params![name], |row| row.get(0))?;
        Ok(ProjectId(id))
    }

    /// Insert the subject if absent and return its id.
    ///
    /// An existing subject keeps its stored attributes; the incoming
    /// values are ignored.
    pub fn ensure_person(&self, person: &PersonRecord, project: ProjectId) -> Result<PersonId> {
        self.tx
            .prepare_cached(
                "INSERT OR IGNORE INTO people (subject, age, sex, treatment, response, project_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?
            .execute(params![
                person.subject,
                person.age,
                person.sex,
                person.treatment,
                person.response,
                project.0
            ])?;
        let id = self
            .tx
            .prepare_cached("SELECT id FROM people WHERE subject = ?1")?
            .query_row(params![person.subject], |row| row.get(0))?;
        Ok(PersonId(id))
    }

    /// Insert the sample, replacing any existing row with the same code.
    pub fn upsert_sample(&self, sample: &SampleRecord, person: PersonId) -> Result<()> {
        let counts = &sample.counts;
        self.tx
            .prepare_cached(
                "INSERT OR REPLACE INTO samples (
                    sample_id, sample_type, time_from_treatment_start,
                    b_cell, cd8_t_cell, cd4_t_cell, nk_cell, monocyte, people_id
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?
            .execute(params![
                sample.sample,
                sample.sample_type,
                sample.time_from_treatment_start,
                counts.b_cell,
                counts.cd8_t_cell,
                counts.cd4_t_cell,
                counts.nk_cell,
                counts.monocyte,
                person.0
            ])?;
        Ok(())
    }

    /// Write one source row: project, then subject, then sample.
    pub fn insert_record(&mut self, record: &CellCountRecord) -> Result<()> {
        let project_id = self.ensure_project(&record.project)?;
        let person_id = self.ensure_person(&record.person, project_id)?;
        self.upsert_sample(&record.sample, person_id)?;
        self.records += 1;
        trace!(
            project_id = %project_id,
            person_id = %person_id,
            sample = %record.sample.sample,
            "wrote record"
        );
        Ok(())
    }

    /// Records written through [`ImportBatch::insert_record`].
    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Commit the transaction, returning the number of records it held.
    pub fn commit(self) -> Result<usize> {
        self.tx.commit()?;
        Ok(self.records)
    }
}
