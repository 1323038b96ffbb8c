//! Error type for CLI command handlers

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::{ConfigError, PipelineError};
use crate::scrape::ScrapeError;
use crate::tabular::TableError;

/// Errors surfaced by `festival-archive-cli` commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Table(#[from] TableError),
}

impl CliError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(err) => {
                format!("{err}\n\nHint: Check the file passed with --config.")
            }
            CliError::Pipeline(err) => err.user_message(),
            CliError::Scrape(err) => err.user_message(),
            CliError::Table(err) => err.user_message(),
            _ => self.to_string(),
        }
    }
}
