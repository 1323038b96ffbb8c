//! Festival archive data wrangling
//!
//! Turns the movie records scraped from a film festival's online archive into
//! an analysis-ready staged table, and generates labelled dirty copies of that
//! data to exercise the cleaning logic.
//!
//! - [`scrape`]: raw per-movie records and the per-festival-year files
//! - [`cleaning`]: single-cell parsers and whole-table cleaning transforms
//! - [`corruption`]: seeded dirt injectors, the inverse of cleaning
//! - [`pipeline`]: fixed-order cleaning and dirty-data pipelines, config, run reports
//! - [`tabular`]: delimited-file table I/O
//! - [`audit`]: the sink transforms report range violations and sampling notes to
//!
//! ```rust,ignore
//! use festival_archive::audit::TracingSink;
//! use festival_archive::pipeline::{WranglerConfig, run_cleaning_pipeline};
//! use festival_archive::tabular::{Delimiter, read_table};
//!
//! let raw = read_table("data/data_zff_src_dirty.csv", Delimiter::Csv)?;
//! let (staged, report) = run_cleaning_pipeline(raw, &WranglerConfig::default(), &TracingSink)?;
//! println!("{} rows staged in {}", staged.len(), report.duration_formatted());
//! ```

pub mod audit;
pub mod cleaning;
pub mod cli;
pub mod corruption;
pub mod models;
pub mod pipeline;
pub mod scrape;
pub mod tabular;

// Re-export commonly used types
pub use audit::{AuditLevel, AuditSink, MemorySink, TracingSink};
pub use models::{CellValue, Row, Table};
pub use pipeline::{
    CleaningPipeline, CorruptionPipeline, PipelineError, PipelineReport, PipelineResult,
    WranglerConfig, run_cleaning_pipeline, run_corruption_pipeline,
};
pub use tabular::{Delimiter, TableError, read_table, write_table};
