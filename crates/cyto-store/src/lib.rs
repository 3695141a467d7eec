//! Durable storage for projects, subjects and cell count samples.
//!
//! # Schema
//!
//! ```text
//! projects(id, project UNIQUE)
//! people(id, subject UNIQUE, age, sex, treatment, response, project_id -> projects.id)
//! samples(id, sample_id UNIQUE, sample_type, time_from_treatment_start,
//!         b_cell, cd8_t_cell, cd4_t_cell, nk_cell, monocyte, people_id -> people.id)
//! ```
//!
//! Projects and people are insert-if-absent; samples are replaced in full
//! when their code is imported again.

mod batch;
mod error;
pub mod schema;
mod store;

pub use batch::ImportBatch;
pub use error::{Result, StoreError};
pub use store::CellStore;
