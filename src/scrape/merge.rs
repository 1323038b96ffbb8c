//! Per-festival-year raw files
//!
//! The scraper writes one file per festival year; merging concatenates them
//! in year order into the source table, tagging each row with its year.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::error::ScrapeError;
use super::record::RawMovieRecord;
use crate::models::columns::FESTIVAL_YEAR;
use crate::models::{CellValue, Table};
use crate::tabular::{Delimiter, read_table, write_table};

/// First festival year with an online archive
pub const FIRST_FESTIVAL_YEAR: i32 = 2005;

/// First festival year not yet archived (exclusive bound)
pub const LAST_FESTIVAL_YEAR: i32 = 2021;

const ARCHIVE_BASE_URL: &str = "https://zff.com/en/archive/?page=1&language=en&festival_year=";

/// Reject any year outside the archived range
pub fn check_festival_years(years: &[i32]) -> Result<(), ScrapeError> {
    match years
        .iter()
        .find(|y| !(FIRST_FESTIVAL_YEAR..LAST_FESTIVAL_YEAR).contains(*y))
    {
        Some(&year) => Err(ScrapeError::FestivalYearOutOfRange {
            year,
            first: FIRST_FESTIVAL_YEAR,
            last: LAST_FESTIVAL_YEAR,
        }),
        None => Ok(()),
    }
}

/// First archive listing page for a festival year
pub fn archive_page_url(year: i32) -> String {
    format!("{ARCHIVE_BASE_URL}{year}")
}

/// `<prefix><year>.csv`
pub fn year_file_path(prefix: &str, year: i32) -> PathBuf {
    PathBuf::from(format!("{prefix}{year}.csv"))
}

/// Persist one festival year's raw records
pub fn write_year_file(
    prefix: &str,
    year: i32,
    records: &[RawMovieRecord],
    delimiter: Delimiter,
) -> Result<PathBuf, ScrapeError> {
    let path = year_file_path(prefix, year);
    let table: Table = records.iter().map(RawMovieRecord::to_row).collect();
    write_table(&path, &table, delimiter)?;
    info!(year, films = records.len(), path = %path.display(), "Wrote festival year file");
    Ok(path)
}

/// Festival years that already have a raw file under `prefix`, ascending
pub fn discover_year_files(prefix: &str) -> Result<Vec<i32>, ScrapeError> {
    let pattern = format!("{}*.csv", glob::Pattern::escape(prefix));
    let mut years: Vec<i32> = glob::glob(&pattern)?
        .filter_map(Result::ok)
        .filter_map(|path| year_from_path(prefix, &path))
        .collect();
    years.sort_unstable();
    years.dedup();
    debug!(prefix, found = years.len(), "Discovered festival year files");
    Ok(years)
}

fn year_from_path(prefix: &str, path: &Path) -> Option<i32> {
    let file_prefix = Path::new(prefix).file_name()?.to_str()?;
    let name = path.file_name()?.to_str()?;
    name.strip_prefix(file_prefix)?
        .strip_suffix(".csv")?
        .parse()
        .ok()
}

/// Concatenate the per-year files for `years` into one raw table.
///
/// Each row gets a `festival_year` cell. Years are checked against the archive
/// range first and every file must exist.
pub fn merge_year_files(
    prefix: &str,
    years: &[i32],
    delimiter: Delimiter,
) -> Result<Table, ScrapeError> {
    check_festival_years(years)?;

    let mut merged = Table::new();
    for &year in years {
        let path = year_file_path(prefix, year);
        if !path.exists() {
            return Err(ScrapeError::MissingYearFile { year, path });
        }
        let mut table = read_table(&path, delimiter)?;
        table.set_column(FESTIVAL_YEAR, |_| CellValue::Integer(i64::from(year)));
        debug!(year, rows = table.len(), "Merging festival year");
        merged.extend_rows(table.rows().iter().cloned());
    }

    info!(years = years.len(), rows = merged.len(), "Merged festival year files");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_festival_years() {
        assert!(check_festival_years(&[2005, 2012, 2020]).is_ok());
        assert!(check_festival_years(&[]).is_ok());
        assert!(matches!(
            check_festival_years(&[2010, 2021]),
            Err(ScrapeError::FestivalYearOutOfRange { year: 2021, .. })
        ));
        assert!(check_festival_years(&[2004]).is_err());
    }

    #[test]
    fn test_paths_and_urls() {
        assert_eq!(
            year_file_path("data/years/data_dirty_zff_", 2011),
            PathBuf::from("data/years/data_dirty_zff_2011.csv")
        );
        assert_eq!(
            archive_page_url(2015),
            "https://zff.com/en/archive/?page=1&language=en&festival_year=2015"
        );
    }

    #[test]
    fn test_year_from_path() {
        let prefix = "data/years/data_dirty_zff_";
        assert_eq!(
            year_from_path(prefix, Path::new("data/years/data_dirty_zff_2014.csv")),
            Some(2014)
        );
        assert_eq!(
            year_from_path(prefix, Path::new("data/years/data_dirty_zff_notes.csv")),
            None
        );
    }
}
