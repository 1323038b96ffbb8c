//! Error types for table I/O and projection

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur reading, writing or projecting a table
#[derive(Error, Debug)]
pub enum TableError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-format error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent
    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    /// File has no header row
    #[error("No header row in {0}")]
    EmptyInput(PathBuf),

    /// Unknown delimiter name
    #[error("Unknown delimiter: {0}. Expected: csv, tsv")]
    UnknownDelimiter(String),
}

impl TableError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            TableError::MissingColumn { column } => {
                format!(
                    "Missing required column: {column}\n\nHint: Check the header row of the input file."
                )
            }
            TableError::EmptyInput(path) => {
                format!(
                    "No header row in {}\n\nHint: The input file must start with a header line.",
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}
