//! Error types for the scrape-side file handling

use std::path::PathBuf;
use thiserror::Error;

use crate::tabular::TableError;

/// Errors raised while checking, writing or merging per-year raw files
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Requested festival year has no archive
    #[error("Festival year {year} is not in range - years must be between {first} and {last}")]
    FestivalYearOutOfRange { year: i32, first: i32, last: i32 },

    /// No raw file for a requested year
    #[error("No raw file for festival year {year}: {}", path.display())]
    MissingYearFile { year: i32, path: PathBuf },

    /// Table read or write error
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Invalid glob built from the year-file prefix
    #[error("Invalid year file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl ScrapeError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ScrapeError::FestivalYearOutOfRange { year, first, last } => format!(
                "Festival year {year} is out of range\n\nHint: The archive covers {first} to {}.",
                last - 1
            ),
            ScrapeError::MissingYearFile { year, path } => format!(
                "No raw file for festival year {year} at {}\n\nHint: Scrape that year first or check --prefix.",
                path.display()
            ),
            ScrapeError::Table(err) => err.user_message(),
            _ => self.to_string(),
        }
    }
}
