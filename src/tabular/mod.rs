//! Delimited-text table I/O
//!
//! Reads and writes the flat files the pipelines exchange. A header row names
//! the columns; empty fields read as `Unknown` and `Unknown` is written back as
//! an empty field. Values are read as text, never type-sniffed.

mod error;

pub use error::TableError;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CellValue, Row, Table};

/// Field delimiter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Csv,
    Tsv,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Csv => b',',
            Delimiter::Tsv => b'\t',
        }
    }
}

impl std::str::FromStr for Delimiter {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "," => Ok(Delimiter::Csv),
            "tsv" | "\t" => Ok(Delimiter::Tsv),
            other => Err(TableError::UnknownDelimiter(other.to_string())),
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Csv => write!(f, "csv"),
            Delimiter::Tsv => write!(f, "tsv"),
        }
    }
}

/// Read a table from a file
///
/// # Errors
///
/// Fails on IO or format errors, or when the file has no header row.
pub fn read_table(path: impl AsRef<Path>, delimiter: Delimiter) -> Result<Table, TableError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_table_from_reader(file, delimiter)?;
    if table.columns().is_empty() {
        return Err(TableError::EmptyInput(path.to_path_buf()));
    }
    debug!(path = %path.display(), rows = table.len(), "Read table");
    Ok(table)
}

/// Read a table from any reader. Short rows are padded with `Unknown`.
pub fn read_table_from_reader<R: Read>(reader: R, delimiter: Delimiter) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut table = Table::with_columns(headers.clone());
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cell = record.get(idx).map_or(CellValue::Unknown, CellValue::from_raw);
                (name.clone(), cell)
            })
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

/// Write a table to a file, creating parent directories as needed
pub fn write_table(
    path: impl AsRef<Path>,
    table: &Table,
    delimiter: Delimiter,
) -> Result<(), TableError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_table_to_writer(file, table, delimiter)?;
    debug!(path = %path.display(), rows = table.len(), "Wrote table");
    Ok(())
}

/// Write a table with a header row to any writer
pub fn write_table_to_writer<W: Write>(
    writer: W,
    table: &Table,
    delimiter: Delimiter,
) -> Result<(), TableError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(writer);

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(table.columns().iter().map(|c| row.get(c).to_field()))?;
    }
    writer.flush()?;
    Ok(())
}
