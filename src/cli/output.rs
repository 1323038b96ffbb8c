//! Output formatting for CLI

use std::path::Path;

use crate::cli::error::CliError;
use crate::pipeline::{CleaningStage, CorruptionStage, PipelineReport};

/// Numbered list of both pipelines' stages
pub fn format_stage_list() -> String {
    let mut output = String::from("Cleaning stages:\n");
    for stage in CleaningStage::all() {
        output.push_str(&format!(
            "  {:>2}. {:<22} {}\n",
            stage.index(),
            stage.name(),
            stage.description()
        ));
    }
    output.push_str("\nCorruption stages:\n");
    for stage in CorruptionStage::all() {
        output.push_str(&format!(
            "  {:>2}. {:<22} {}\n",
            stage.index(),
            stage.name(),
            stage.description()
        ));
    }
    output
}

/// Write a run report as pretty JSON
pub fn write_report_json(path: &Path, report: &PipelineReport) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| CliError::FileWriteError(path.to_path_buf(), e.to_string()))
}
