//! Domain model for immune cell count ingestion and analysis.

pub mod cohort;
pub mod error;
pub mod ids;
pub mod options;
pub mod population;
pub mod records;
pub mod summary;

pub use cohort::CohortFilter;
pub use error::{ModelError, Result};
pub use ids::{PersonId, ProjectId};
pub use options::{DEFAULT_BATCH_SIZE, DEFAULT_BUSY_TIMEOUT, ImportOptions, StoreOptions};
pub use population::{Population, PopulationCounts};
pub use records::{
    BaselineRow, CellCountRecord, PersonRecord, SampleCounts, SampleMetadata, SampleRecord,
    StoredPerson, StoredSample,
};
pub use summary::{BaselineSummary, FrequencyRow, FrequencyTable};
