//! Error types for pipeline operations
//!
//! Errors chain to their cause for debugging and carry a user-facing
//! message with a hint for CLI output.

use std::path::PathBuf;
use thiserror::Error;

use crate::corruption::CorruptionError;
use crate::tabular::TableError;

/// Errors loading or validating a [`WranglerConfig`](super::WranglerConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but failed validation
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors that can occur during pipeline execution
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Pipeline configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    /// Stage failed with underlying cause
    #[error("Stage '{stage}' failed: {source}")]
    StageFailure {
        stage: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Table read, write or projection error
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Create a stage failure with underlying error
    pub fn stage_failure<E>(stage: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StageFailure {
            stage: stage.into(),
            source: Box::new(source),
        }
    }

    /// Get the stage name if this is a stage failure
    pub fn stage_name(&self) -> Option<&str> {
        match self {
            PipelineError::StageFailure { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::ConfigError(err) => {
                format!("{err}\n\nHint: Check your wrangler configuration file.")
            }
            PipelineError::StageFailure { stage, source } => {
                if let Some(err) = source.downcast_ref::<TableError>() {
                    format!("Stage '{stage}' failed: {}", err.user_message())
                } else if let Some(err) = source.downcast_ref::<CorruptionError>() {
                    format!("Stage '{stage}' failed: {}", err.user_message())
                } else {
                    self.to_string()
                }
            }
            PipelineError::Table(err) => err.user_message(),
            PipelineError::FileNotFound(path) => {
                format!(
                    "File not found: {}\n\nHint: Check that the file exists and the path is correct.",
                    path.display()
                )
            }
        }
    }
}
