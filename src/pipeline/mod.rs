//! Fixed-order pipelines over whole tables
//!
//! Two directions share one configuration:
//!
//! - **Cleaning** turns a raw (or dirty) table into the staged projection.
//!   Stage order is load-bearing: whitespace is stripped before denylist
//!   prefix matching, and the country comma is stripped before countries
//!   are counted.
//! - **Corruption** injects labelled dirt into a clean table so the cleaning
//!   direction has something to recover from.
//!
//! # Example
//!
//! ```rust,ignore
//! use festival_archive::audit::TracingSink;
//! use festival_archive::pipeline::{WranglerConfig, clean_file};
//!
//! let config = WranglerConfig::load("wrangler.toml")?;
//! let report = clean_file(&config.paths.dirty, &config.paths.stage, &config, &TracingSink)?;
//! report.print_summary();
//! ```
//!
//! # Cleaning stages
//!
//! 1. **split_alternate_title**: "Title/Alternate" into `film_title` and `alt_title`
//! 2. **strip_whitespace**
//! 3. **merge_directors**: `director` and `directors` into `director`
//! 4. **tag_festival**
//! 5. **drop_denylisted**: programme blocks, talks, concerts
//! 6. **deduplicate**: on `(link, festival_year)` by default
//! 7. **fix_misspellings**: known misspellings in `country`
//! 8. **normalize_year**
//! 9. **strip_country_comma**
//! 10. **country_count**
//! 11. **normalize_runtime**
//! 12. **select_columns**
//!
//! Injected runtime outliers are deliberately unrecoverable: cleaning turns
//! them into unknown rather than restoring the original value. Year shorthand
//! is only injected into years 1920 to 2019, the range whose two-digit form
//! expands back to the same year.

mod config;
mod error;
mod executor;
mod report;

pub use config::{
    CleaningStage, CorruptionConfig, CorruptionStage, Misspelling, PathsConfig, WranglerConfig,
};
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use executor::{CleaningPipeline, CorruptionPipeline};
pub use report::{PipelineKind, PipelineReport, StageOutput};

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::audit::AuditSink;
use crate::models::Table;
use crate::tabular::{read_table, write_table};

/// Run the cleaning pipeline on an in-memory table
pub fn run_cleaning_pipeline(
    table: Table,
    config: &WranglerConfig,
    sink: &dyn AuditSink,
) -> PipelineResult<(Table, PipelineReport)> {
    CleaningPipeline::new(config, sink)?.run(table)
}

/// Run the dirty-data pipeline on an in-memory table
pub fn run_corruption_pipeline<R: Rng + ?Sized>(
    table: Table,
    config: &WranglerConfig,
    rng: &mut R,
    sink: &dyn AuditSink,
) -> PipelineResult<(Table, PipelineReport)> {
    CorruptionPipeline::new(config, sink)?.run(table, rng)
}

/// Read `input`, clean it, and write the staged table to `output`
pub fn clean_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &WranglerConfig,
    sink: &dyn AuditSink,
) -> PipelineResult<PipelineReport> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(PipelineError::FileNotFound(input.to_path_buf()));
    }
    let table = read_table(input, config.delimiter)?;
    let (staged, report) = run_cleaning_pipeline(table, config, sink)?;
    write_table(output.as_ref(), &staged, config.delimiter)?;
    info!(output = %output.as_ref().display(), rows = staged.len(), "Wrote staged table");
    Ok(report)
}

/// Read `input`, inject dirt, and write the dirty table to `output`.
///
/// Uses the configured seed when set, OS entropy otherwise.
pub fn dirty_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &WranglerConfig,
    sink: &dyn AuditSink,
) -> PipelineResult<PipelineReport> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(PipelineError::FileNotFound(input.to_path_buf()));
    }
    let mut rng = match config.corruption.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let table = read_table(input, config.delimiter)?;
    let (dirty, report) = run_corruption_pipeline(table, config, &mut rng, sink)?;
    write_table(output.as_ref(), &dirty, config.delimiter)?;
    info!(output = %output.as_ref().display(), rows = dirty.len(), "Wrote dirty table");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemorySink;
    use tempfile::TempDir;

    const RAW: &str = "\
link,film_title,genre,country,runtime,languages,subtitles,director,festival_year,year,directors
https://zff.com/1/, Anonymous ,Drama,\",UK,Germany\",130 Min,English,German,Roland Emmerich,2011,2011.0,
https://zff.com/2/,Kurzfilmprogramm 1,Short,Switzerland,90 Min,,,,2011,2011.0,
";

    #[test]
    fn test_clean_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("dirty.csv");
        let output = temp.path().join("out").join("stage.csv");
        std::fs::write(&input, RAW).unwrap();

        let config = WranglerConfig::default();
        let report = clean_file(&input, &output, &config, &MemorySink::new()).unwrap();
        assert_eq!(report.rows_out, 1);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "link,film_title,alt_title,festival_name,festival_year,director,country,country_count,year,languages,runtime\n\
             https://zff.com/1/,Anonymous,,ZFF,2011,Roland Emmerich,\"UK,Germany\",2,2011,English,130\n"
        );
    }

    #[test]
    fn test_missing_input_file() {
        let temp = TempDir::new().unwrap();
        let config = WranglerConfig::default();
        let err = dirty_file(
            temp.path().join("absent.csv"),
            temp.path().join("dirty.csv"),
            &config,
            &MemorySink::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_dirty_file_is_reproducible_with_seed() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("src.csv");
        std::fs::write(&input, RAW).unwrap();
        let config = WranglerConfig::default().with_seed(7);

        let a = temp.path().join("a.csv");
        let b = temp.path().join("b.csv");
        dirty_file(&input, &a, &config, &MemorySink::new()).unwrap();
        dirty_file(&input, &b, &config, &MemorySink::new()).unwrap();
        assert_eq!(
            std::fs::read_to_string(a).unwrap(),
            std::fs::read_to_string(b).unwrap()
        );
    }
}
