//! CSV ingestion of immune cell counts.
//!
//! Each source row names a project, a subject and a sample. The importer
//! writes them in that order so parents always exist before children:
//!
//! 1. project: insert if absent
//! 2. subject: insert if absent, existing attributes are kept
//! 3. sample: insert or replace by sample code
//!
//! Numeric fields must parse as integers; the first bad value aborts the run
//! with its line and column.

pub mod columns;
mod error;
mod import;
mod reader;

pub use columns::{ColumnIndex, REQUIRED_COLUMNS};
pub use error::{ImportError, Result};
pub use import::{ImportReport, import_cell_counts, import_records};
pub use reader::{CellCountReader, parse_record};
