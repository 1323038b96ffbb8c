//! Per-run and per-stage reporting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which direction a pipeline ran in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Cleaning,
    Corruption,
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cleaning => write!(f, "cleaning"),
            Self::Corruption => write!(f, "corruption"),
        }
    }
}

/// Output from one pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutput {
    /// Stage name
    pub stage: String,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Cells rewritten, for stages that rewrite cells in place
    pub cells_changed: Option<usize>,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl StageOutput {
    /// Create an output for a stage that has just run
    pub fn new(stage: impl Into<String>, rows_before: usize, rows_after: usize) -> Self {
        Self {
            stage: stage.into(),
            rows_before,
            rows_after,
            cells_changed: None,
            duration_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Set the number of rewritten cells
    pub fn with_cells_changed(mut self, cells: Option<usize>) -> Self {
        self.cells_changed = cells;
        self
    }

    /// Set duration
    pub fn with_duration(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Rows added (positive) or removed (negative) by the stage
    pub fn row_delta(&self) -> i64 {
        self.rows_after as i64 - self.rows_before as i64
    }
}

/// Report from a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Run ID
    pub run_id: String,
    pub kind: PipelineKind,
    pub started_at: DateTime<Utc>,
    /// SHA-256 of the configuration the run used
    pub config_hash: String,
    pub rows_in: usize,
    pub rows_out: usize,
    /// Total duration in milliseconds
    pub duration_ms: u64,
    /// Stage outputs, in execution order
    pub stages: Vec<StageOutput>,
}

impl PipelineReport {
    /// Look up one stage's output by name
    pub fn stage(&self, name: &str) -> Option<&StageOutput> {
        self.stages.iter().find(|s| s.stage == name)
    }

    /// Get formatted duration
    pub fn duration_formatted(&self) -> String {
        let secs = self.duration_ms / 1000;
        let mins = secs / 60;
        let remaining_secs = secs % 60;

        if mins > 0 {
            format!("{}m {}s", mins, remaining_secs)
        } else if secs > 0 {
            format!("{}s", secs)
        } else {
            format!("{}ms", self.duration_ms)
        }
    }

    /// Print summary to stderr
    pub fn print_summary(&self) {
        eprintln!();
        eprintln!("{} pipeline {} - completed", self.kind, self.run_id);
        eprintln!("Duration: {}", self.duration_formatted());
        eprintln!("Rows: {} -> {}", self.rows_in, self.rows_out);

        for stage in &self.stages {
            let changed = stage
                .cells_changed
                .map(|n| format!(", {n} cells changed"))
                .unwrap_or_default();
            eprintln!(
                "  - {}: {} -> {} rows{} ({}ms)",
                stage.stage, stage.rows_before, stage.rows_after, changed, stage.duration_ms
            );
        }
    }
}
