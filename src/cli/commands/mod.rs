//! CLI command handlers
//!
//! Each handler takes plain argument structs filled in by `main` and the
//! loaded [`WranglerConfig`]; command-line values override the config.

use std::path::PathBuf;

use tracing::info;

use crate::audit::{AuditLevel, MemorySink, TeeSink, TracingSink};
use crate::cleaning::YearRangeCheck;
use crate::cli::error::CliError;
use crate::cli::output::{format_stage_list, write_report_json};
use crate::pipeline::{PipelineReport, WranglerConfig, clean_file, dirty_file};
use crate::scrape::{discover_year_files, merge_year_files};
use crate::tabular::write_table;

/// Arguments for the `merge` command
pub struct MergeArgs {
    /// Festival years to merge (empty = every year file found)
    pub years: Vec<i32>,
    /// Per-year file prefix
    pub prefix: Option<String>,
    /// Merged source table
    pub output: Option<PathBuf>,
}

/// Arguments for the `dirty` command
pub struct DirtyArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Sampling seed
    pub seed: Option<u64>,
    /// Write the run report as JSON
    pub report: Option<PathBuf>,
}

/// Arguments for the `clean` command
pub struct CleanArgs {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub year_check: Option<YearRangeCheck>,
    /// Write the run report as JSON
    pub report: Option<PathBuf>,
}

/// Handle the `merge` command
pub fn handle_merge(args: &MergeArgs, config: &WranglerConfig) -> Result<(), CliError> {
    let prefix = args
        .prefix
        .clone()
        .unwrap_or_else(|| config.paths.year_file_prefix.clone());
    let output = args.output.clone().unwrap_or_else(|| config.paths.source.clone());

    let years = if args.years.is_empty() {
        discover_year_files(&prefix)?
    } else {
        args.years.clone()
    };
    if years.is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "No festival year files found with prefix '{prefix}'"
        )));
    }

    info!(years = ?years, prefix = %prefix, "Merging festival years");
    let merged = merge_year_files(&prefix, &years, config.delimiter)?;
    write_table(&output, &merged, config.delimiter)?;

    eprintln!(
        "Merged {} festival year(s), {} rows -> {}",
        years.len(),
        merged.len(),
        output.display()
    );
    Ok(())
}

/// Handle the `dirty` command
pub fn handle_dirty(args: &DirtyArgs, config: &WranglerConfig) -> Result<(), CliError> {
    let mut config = config.clone();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let input = args.input.clone().unwrap_or_else(|| config.paths.source.clone());
    let output = args.output.clone().unwrap_or_else(|| config.paths.dirty.clone());

    let events = MemorySink::new();
    let sink = TeeSink::new(&TracingSink, &events);
    let report = dirty_file(&input, &output, &config, &sink)?;
    finish(&report, args.report.as_deref())?;

    let skipped = events
        .records()
        .iter()
        .filter(|r| r.level == AuditLevel::Warn)
        .count();
    if skipped > 0 {
        eprintln!("{skipped} injector(s) found nothing to corrupt");
    }
    eprintln!("Dirty table written to {}", output.display());
    Ok(())
}

/// Handle the `clean` command
pub fn handle_clean(args: &CleanArgs, config: &WranglerConfig) -> Result<(), CliError> {
    let mut config = config.clone();
    if let Some(check) = args.year_check {
        config = config.with_year_range_check(check);
    }
    let input = args.input.clone().unwrap_or_else(|| config.paths.dirty.clone());
    let output = args.output.clone().unwrap_or_else(|| config.paths.stage.clone());

    let events = MemorySink::new();
    let sink = TeeSink::new(&TracingSink, &events);
    let report = clean_file(&input, &output, &config, &sink)?;
    finish(&report, args.report.as_deref())?;

    let rejected = events.count("normalize_runtime", AuditLevel::Info)
        + events.count("normalize_year", AuditLevel::Info);
    if rejected > 0 {
        eprintln!("{rejected} out-of-range runtime/year value(s) set to unknown");
    }
    eprintln!("Staged table written to {}", output.display());
    Ok(())
}

/// Handle the `stages` command
pub fn handle_stages() -> Result<(), CliError> {
    print!("{}", format_stage_list());
    Ok(())
}

fn finish(report: &PipelineReport, json_path: Option<&std::path::Path>) -> Result<(), CliError> {
    report.print_summary();
    if let Some(path) = json_path {
        write_report_json(path, report)?;
        info!(path = %path.display(), "Wrote run report");
    }
    Ok(())
}
