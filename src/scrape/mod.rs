//! Scrape-side surface: turning movie pages into raw records and managing
//! the per-festival-year raw files
//!
//! Page retrieval itself (browser automation, pagination, retries) lives
//! outside this crate; it hands over each page's title, info-list items and
//! URL, and this module takes it from there.

mod error;
pub mod merge;
pub mod record;

pub use error::ScrapeError;
pub use merge::{
    FIRST_FESTIVAL_YEAR, LAST_FESTIVAL_YEAR, archive_page_url, check_festival_years,
    discover_year_files, merge_year_files, write_year_file, year_file_path,
};
pub use record::{RawMovieRecord, parse_info_item, split_country_year};
