//! Probabilistic dirt injectors
//!
//! Every injector samples `round(ratio * eligible)` rows without replacement
//! from the rows it can act on, rewrites only those, and reports how many
//! cells (or appended rows) it produced.

use rand::Rng;
use rand::seq::index;

use super::error::CorruptionError;
use crate::audit::AuditSink;
use crate::cleaning::Bounds;
use crate::cleaning::parsers::{expand_short_year, render_minutes_as_hours};
use crate::models::columns::{RUNTIME, YEAR};
use crate::models::{CellValue, Row, Table};

/// Default outlier range in minutes
pub const OUTLIER_RANGE: Bounds = Bounds::new(800, 10_000);

fn check_ratio(stage: &str, ratio: f64) -> Result<(), CorruptionError> {
    if (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(CorruptionError::InvalidRatio {
            stage: stage.to_string(),
            ratio,
        })
    }
}

/// Number of rows a ratio selects from `eligible` rows; halves round to even
pub fn sample_size(eligible: usize, ratio: f64) -> usize {
    ((eligible as f64 * ratio).round_ties_even() as usize).min(eligible)
}

/// Pick [`sample_size`] of the eligible row indices, in table order
fn sample_eligible<R: Rng + ?Sized>(eligible: &[usize], ratio: f64, rng: &mut R) -> Vec<usize> {
    let amount = sample_size(eligible.len(), ratio);
    let mut picked: Vec<usize> = index::sample(rng, eligible.len(), amount)
        .into_iter()
        .map(|i| eligible[i])
        .collect();
    picked.sort_unstable();
    picked
}

fn eligible_rows<F>(table: &Table, mut is_eligible: F) -> Vec<usize>
where
    F: FnMut(&Row) -> bool,
{
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| is_eligible(row))
        .map(|(idx, _)| idx)
        .collect()
}

/// Rewrite the sampled cells of `column` with `f`, returning how many changed
fn rewrite_sampled<F>(table: &mut Table, column: &str, rows: &[usize], mut f: F) -> usize
where
    F: FnMut(&CellValue) -> CellValue,
{
    let mut changed = 0;
    let all = table.rows_mut();
    for &idx in rows {
        let row = &mut all[idx];
        let next = f(row.get(column));
        if *row.get(column) != next {
            row.set(column, next);
            changed += 1;
        }
    }
    changed
}

/// Replace every occurrence of `value` with `misspelled` in a sampled share of
/// the `column` cells that contain `value`
pub fn add_misspelling<R: Rng + ?Sized>(
    table: &mut Table,
    column: &str,
    value: &str,
    misspelled: &str,
    ratio: f64,
    rng: &mut R,
    sink: &dyn AuditSink,
) -> Result<usize, CorruptionError> {
    const STAGE: &str = "add_misspelling";
    check_ratio(STAGE, ratio)?;

    let eligible = eligible_rows(table, |row| {
        row.get(column).as_text().is_some_and(|text| text.contains(value))
    });
    if eligible.is_empty() {
        sink.warn(STAGE, &format!("No '{column}' cells contain '{value}', nothing to misspell"));
        return Ok(0);
    }

    let sampled = sample_eligible(&eligible, ratio, rng);
    let changed = rewrite_sampled(table, column, &sampled, |cell| match cell {
        CellValue::Text(text) => CellValue::Text(text.replace(value, misspelled)),
        other => other.clone(),
    });
    sink.info(STAGE, &format!("add misspellings for {value} in {changed} rows."));
    Ok(changed)
}

/// Render a `"<n> Min"` cell as `"<h> hrs <m>"`; other shapes pass through
pub fn minutes_to_hours_cell(cell: &CellValue) -> CellValue {
    let minutes = match cell {
        CellValue::Text(text) => {
            let trimmed = text.trim();
            let split = trimmed.len().saturating_sub(3);
            match trimmed.get(split..) {
                Some(unit) if unit.eq_ignore_ascii_case("min") => {
                    trimmed[..split].trim().parse::<i64>().ok()
                }
                _ => None,
            }
        }
        CellValue::Unknown => None,
        other => other.as_integer(),
    };
    match minutes {
        Some(minutes) => CellValue::Text(render_minutes_as_hours(minutes)),
        None => cell.clone(),
    }
}

/// Convert a sampled share of known runtimes to the hours format
pub fn runtime_format_drift<R: Rng + ?Sized>(
    table: &mut Table,
    ratio: f64,
    rng: &mut R,
    sink: &dyn AuditSink,
) -> Result<usize, CorruptionError> {
    const STAGE: &str = "runtime_format_drift";
    check_ratio(STAGE, ratio)?;

    let eligible = eligible_rows(table, |row| !row.get(RUNTIME).is_unknown());
    if eligible.is_empty() {
        sink.warn(STAGE, "No known runtimes, nothing to convert");
        return Ok(0);
    }

    let sampled = sample_eligible(&eligible, ratio, rng);
    let changed = rewrite_sampled(table, RUNTIME, &sampled, minutes_to_hours_cell);
    sink.info(STAGE, &format!("for '{RUNTIME}' column changed {changed} rows to 'hr'"));
    Ok(changed)
}

/// `2014` becomes `14`; non-numeric cells pass through
pub fn shorten_year_cell(cell: &CellValue) -> CellValue {
    match cell.as_integer() {
        Some(year) => CellValue::Integer(year % 100),
        None => cell.clone(),
    }
}

/// Whether a year's two-digit form expands back to the same year
pub fn survives_shorthand(cell: &CellValue) -> bool {
    cell.as_integer()
        .is_some_and(|year| expand_short_year(&shorten_year_cell(cell)) == Some(year))
}

/// Reduce a sampled share of years to two digits.
///
/// Only years the cleaning side can expand back are eligible (1920 to 2019
/// with the fixed pivot); 2020 or 1915 would come back wrong.
pub fn year_shorthand_drift<R: Rng + ?Sized>(
    table: &mut Table,
    ratio: f64,
    rng: &mut R,
    sink: &dyn AuditSink,
) -> Result<usize, CorruptionError> {
    const STAGE: &str = "year_shorthand_drift";
    check_ratio(STAGE, ratio)?;

    let eligible = eligible_rows(table, |row| survives_shorthand(row.get(YEAR)));
    if eligible.is_empty() {
        sink.warn(STAGE, "No years with a recoverable short form, nothing to shorten");
        return Ok(0);
    }

    let sampled = sample_eligible(&eligible, ratio, rng);
    let changed = rewrite_sampled(table, YEAR, &sampled, shorten_year_cell);
    sink.info(STAGE, &format!("for '{YEAR}' column changed {changed} rows to 'short form'"));
    Ok(changed)
}

/// Append a sampled share of rows twice, as one block repeated.
///
/// The table grows by exactly `2 * round(ratio * len)` rows. Returns rows appended.
pub fn inject_duplicates<R: Rng + ?Sized>(
    table: &mut Table,
    ratio: f64,
    rng: &mut R,
    sink: &dyn AuditSink,
) -> Result<usize, CorruptionError> {
    const STAGE: &str = "inject_duplicates";
    check_ratio(STAGE, ratio)?;

    if table.is_empty() {
        sink.warn(STAGE, "Table is empty, nothing to duplicate");
        return Ok(0);
    }

    let all: Vec<usize> = (0..table.len()).collect();
    let sampled = sample_eligible(&all, ratio, rng);
    let block: Vec<Row> = sampled.iter().map(|&idx| table.rows()[idx].clone()).collect();

    let appended = block.len() * 2;
    table.extend_rows(block.iter().cloned().chain(block.iter().cloned()));
    sink.info(STAGE, &format!("add {appended} 'duplicate' rows"));
    Ok(appended)
}

/// Replace a sampled share of runtimes with an implausible `"<n>Min"` value.
///
/// Cells already in the hours format are left alone.
pub fn inject_runtime_outliers<R: Rng + ?Sized>(
    table: &mut Table,
    ratio: f64,
    range: Bounds,
    rng: &mut R,
    sink: &dyn AuditSink,
) -> Result<usize, CorruptionError> {
    const STAGE: &str = "inject_runtime_outliers";
    check_ratio(STAGE, ratio)?;
    if !range.is_valid() {
        return Err(CorruptionError::InvalidOutlierRange {
            min: range.min,
            max: range.max,
        });
    }

    let eligible = eligible_rows(table, |row| !row.get(RUNTIME).is_unknown());
    if eligible.is_empty() {
        sink.warn(STAGE, "No known runtimes, nothing to replace");
        return Ok(0);
    }

    let sampled = sample_eligible(&eligible, ratio, rng);
    let changed = rewrite_sampled(table, RUNTIME, &sampled, |cell| {
        if cell.to_string().contains("hr") {
            return cell.clone();
        }
        let minutes = rng.random_range(range.min..=range.max);
        CellValue::Text(format!("{minutes}Min"))
    });
    sink.info(STAGE, &format!("for '{RUNTIME}' column changed {changed} rows to 'outliers'"));
    Ok(changed)
}
