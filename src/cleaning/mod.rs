//! Cleaning direction: field parsers and whole-table transforms
//!
//! [`parsers`] turns one raw cell into a normalized value or `Unknown`;
//! [`transforms`] applies them across a [`Table`](crate::models::Table).
//! The fixed composition of both lives in [`crate::pipeline`].

pub mod parsers;
pub mod transforms;

pub use parsers::{Bounds, RUNTIME_BOUNDS, YEAR_BOUNDS, YearRangeCheck};
pub use transforms::{
    add_country_count, deduplicate_rows, drop_known_non_movie_rows, merge_director_columns,
    normalize_runtime_column, normalize_year_column, select_columns, split_alternate_title,
    strip_leading_comma, strip_whitespace, substitute_known_misspellings, tag_source_festival,
};

/// Tag written into `festival_name`
pub const DEFAULT_FESTIVAL_TAG: &str = "ZFF";

/// Known misspellings in the country column and their corrections, applied in order
pub const DEFAULT_KNOWN_TERMS: [(&str, &str); 2] = [("USAA", "USA"), ("Spein", "Spain")];

/// Title prefixes of archive entries that are programme blocks, talks or concerts
pub const DEFAULT_DENYLIST: &[&str] = &[
    "ZFF Masters:",
    "ZFF Talks: ",
    "A Conversation with...",
    "A Conversation With ...",
    "Filmmusikkonzert",
    "craftwork",
    "Public Zurich Master Class:",
    "Internationaler Filmmusikwettbewerb",
    "Filmmusikwettbewerb",
    "Kurzfilme",
    "Int. Filmmusikwettbewerb",
    "Kurzfilme aus Mexiko",
    "Kurzfilme aus Ungarn",
    "Kurzfilmprogramm:",
    "Short Cuts vol.",
    "Zürcher Filmpreis:",
    "onedotzero_ch",
    "wavelength 1",
    "wow+flutter 1",
    "Kurzfilmblock",
    "Kurzfilmprogramm",
    "Kurzes aus Italien",
    "Kurzes aus Kolumbien",
    "Kurzes aus der Türkei",
];
