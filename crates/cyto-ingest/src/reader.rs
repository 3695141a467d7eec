//! Typed record reader over a cell count CSV file.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{Reader, ReaderBuilder, StringRecord};

use cyto_model::{CellCountRecord, PersonRecord, Population, PopulationCounts, SampleRecord};

use crate::columns::{self, ColumnIndex};
use crate::error::{ImportError, Result};

/// Yields one [`CellCountRecord`] per data row, in file order.
///
/// Columns are resolved when the reader is created, so a missing column
/// fails before any row is produced.
pub struct CellCountReader<R> {
    reader: Reader<R>,
    columns: ColumnIndex,
    record: StringRecord,
}

impl CellCountReader<File> {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|source| ImportError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(reader)
    }
}

impl<R: Read> CellCountReader<R> {
    pub fn from_reader(input: R) -> Result<Self> {
        let reader = ReaderBuilder::new().has_headers(true).from_reader(input);
        Self::new(reader)
    }

    fn new(mut reader: Reader<R>) -> Result<Self> {
        let columns = ColumnIndex::resolve(reader.headers()?)?;
        Ok(Self {
            reader,
            columns,
            record: StringRecord::new(),
        })
    }

    fn next_record(&mut self) -> Result<Option<CellCountRecord>> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        parse_record(&self.record, &self.columns).map(Some)
    }
}

impl<R: Read> Iterator for CellCountReader<R> {
    type Item = Result<CellCountRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Convert one raw row into a typed record.
pub fn parse_record(record: &StringRecord, columns: &ColumnIndex) -> Result<CellCountRecord> {
    let line = record.position().map_or(0, csv::Position::line);
    let text = |idx: usize| record.get(idx).unwrap_or_default().to_string();

    let age = parse_integer(record.get(columns.age).unwrap_or_default(), line, columns::AGE)?;
    let mut counts = PopulationCounts::default();
    for population in Population::ALL {
        let value = record.get(columns.count(population)).unwrap_or_default();
        counts.set(population, parse_integer(value, line, population.as_str())?);
    }

    Ok(CellCountRecord {
        project: text(columns.project),
        person: PersonRecord {
            subject: text(columns.subject),
            age,
            sex: text(columns.sex),
            treatment: text(columns.treatment),
            response: text(columns.response),
        },
        sample: SampleRecord {
            sample: text(columns.sample),
            sample_type: text(columns.sample_type),
            time_from_treatment_start: text(columns.time_from_treatment_start),
            counts,
        },
    })
}

fn parse_integer<T>(value: &str, line: u64, column: &'static str) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|source| ImportError::InvalidInteger {
            line,
            column,
            value: value.to_string(),
            source,
        })
}
