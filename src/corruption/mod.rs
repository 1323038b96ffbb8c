//! Dirty-data generation
//!
//! The inverse of [`crate::cleaning`]: each injector reintroduces one kind of
//! malformation into a sampled share of a clean table so the cleaning pipeline
//! has labelled dirt to recover from. Randomness is always passed in, so a
//! seeded `StdRng` reproduces the same dirty table.

mod error;
pub mod transforms;

pub use error::CorruptionError;
pub use transforms::{
    OUTLIER_RANGE, add_misspelling, inject_duplicates, inject_runtime_outliers,
    runtime_format_drift, sample_size, survives_shorthand, year_shorthand_drift,
};
