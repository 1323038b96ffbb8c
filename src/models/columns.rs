//! Column names used across the archive tables

pub const LINK: &str = "link";
pub const FILM_TITLE: &str = "film_title";
pub const ALT_TITLE: &str = "alt_title";
pub const FESTIVAL_NAME: &str = "festival_name";
pub const FESTIVAL_YEAR: &str = "festival_year";
pub const GENRE: &str = "genre";
pub const COUNTRY: &str = "country";
pub const COUNTRY_COUNT: &str = "country_count";
pub const DIRECTOR: &str = "director";
/// Second director column produced by inconsistent page markup
pub const DIRECTORS: &str = "directors";
pub const YEAR: &str = "year";
pub const LANGUAGES: &str = "languages";
pub const RUNTIME: &str = "runtime";
pub const SUBTITLES: &str = "subtitles";

/// Columns written to the staged table, in output order
pub const STAGE_COLUMNS: [&str; 11] = [
    LINK,
    FILM_TITLE,
    ALT_TITLE,
    FESTIVAL_NAME,
    FESTIVAL_YEAR,
    DIRECTOR,
    COUNTRY,
    COUNTRY_COUNT,
    YEAR,
    LANGUAGES,
    RUNTIME,
];
