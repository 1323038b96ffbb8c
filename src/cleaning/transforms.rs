//! Whole-table cleaning transforms
//!
//! Each transform owns the columns it names and mutates the table in place,
//! returning how many cells or rows it touched.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::parsers::{
    self, Bounds, YearRangeCheck, convert_hours_cell, count_csv_tokens, expand_short_year,
    runtime_cell_to_minutes, validate_runtime_range, validate_year_range,
};
use crate::audit::AuditSink;
use crate::models::columns::{
    ALT_TITLE, COUNTRY, COUNTRY_COUNT, DIRECTOR, DIRECTORS, FESTIVAL_NAME, FILM_TITLE, RUNTIME,
    YEAR,
};
use crate::models::{CellValue, Row, Table};
use crate::tabular::TableError;

/// Trim leading and trailing whitespace from every text cell
pub fn strip_whitespace(table: &mut Table) -> usize {
    let mut changed = 0;
    for row in table.rows_mut() {
        for (_, cell) in row.iter_mut() {
            if let CellValue::Text(text) = cell {
                let trimmed = text.trim();
                if trimmed.len() != text.len() {
                    *text = trimmed.to_string();
                    changed += 1;
                }
            }
        }
    }
    changed
}

/// Split "Title/Alternate" on the first `/`.
///
/// The left part replaces the title; the right part (or unknown) fills the
/// alternate-title column. Returns the number of titles that were split.
pub fn split_alternate_title(table: &mut Table) -> usize {
    let mut split = 0;
    table.set_column(ALT_TITLE, |row| match row.get(FILM_TITLE) {
        CellValue::Text(title) => match title.split_once('/') {
            Some((_, alt)) => CellValue::text(alt),
            None => CellValue::Unknown,
        },
        _ => CellValue::Unknown,
    });
    table.map_column(FILM_TITLE, |cell| match cell {
        CellValue::Text(title) => match title.split_once('/') {
            Some((main, _)) => {
                split += 1;
                CellValue::text(main)
            }
            None => cell.clone(),
        },
        other => other.clone(),
    });
    split
}

/// Combine the `director` and `directors` columns into `director`
pub fn merge_director_cells(director: &CellValue, directors: &CellValue) -> CellValue {
    match (director.is_unknown(), directors.is_unknown()) {
        (false, false) => CellValue::Text(format!("{director},{directors}")),
        (false, true) => director.clone(),
        (true, false) => directors.clone(),
        (true, true) => CellValue::text(""),
    }
}

/// Apply [`merge_director_cells`] to every row
pub fn merge_director_columns(table: &mut Table) {
    table.set_column(DIRECTOR, |row| {
        merge_director_cells(row.get(DIRECTOR), row.get(DIRECTORS))
    });
}

/// Set a constant festival tag on every row
pub fn tag_source_festival(table: &mut Table, tag: &str) {
    table.set_column(FESTIVAL_NAME, |_| CellValue::text(tag));
}

/// Whether a title starts with any denylisted prefix (case-sensitive)
pub fn is_denylisted(title: &CellValue, denylist: &[String]) -> bool {
    match title {
        CellValue::Text(title) => denylist.iter().any(|prefix| title.starts_with(prefix.as_str())),
        _ => false,
    }
}

/// Remove festival programme entries that are not films. Returns rows removed.
pub fn drop_known_non_movie_rows(
    table: &mut Table,
    denylist: &[String],
    sink: &dyn AuditSink,
) -> usize {
    table.retain(|row| {
        let drop = is_denylisted(row.get(FILM_TITLE), denylist);
        if drop {
            sink.debug("drop_denylisted", &format!("Dropping '{}'", row.get(FILM_TITLE)));
        }
        !drop
    })
}

fn dedup_key<S: AsRef<str>>(row: &Row, key_columns: &[S]) -> Vec<Option<String>> {
    key_columns
        .iter()
        .map(|c| row.get(c.as_ref()).dedup_key())
        .collect()
}

/// Drop rows repeating an earlier row's key tuple, keeping the first.
/// Unknown key cells compare equal to each other. Returns rows removed.
pub fn deduplicate_rows<S: AsRef<str>>(table: &mut Table, key_columns: &[S]) -> usize {
    let mut seen = HashSet::new();
    table.retain(|row| seen.insert(dedup_key(row, key_columns)))
}

/// Drop one leading comma from every cell of `column`
pub fn strip_leading_comma(table: &mut Table, column: &str) -> usize {
    table.map_column(column, parsers::strip_leading_comma)
}

/// Replace every occurrence of each known misspelling, in map order
pub fn substitute_cell(cell: &CellValue, substitutions: &IndexMap<String, String>) -> CellValue {
    match cell {
        CellValue::Text(text) => {
            let mut fixed = text.clone();
            for (wrong, right) in substitutions {
                if fixed.contains(wrong.as_str()) {
                    fixed = fixed.replace(wrong.as_str(), right);
                }
            }
            CellValue::Text(fixed)
        }
        other => other.clone(),
    }
}

/// Apply [`substitute_cell`] to a whole column
pub fn substitute_known_misspellings(
    table: &mut Table,
    column: &str,
    substitutions: &IndexMap<String, String>,
) -> usize {
    table.map_column(column, |cell| substitute_cell(cell, substitutions))
}

/// Hours to minutes, strip the unit, then range-check. Result is integer or unknown.
pub fn normalize_runtime_cell(cell: &CellValue, bounds: Bounds, sink: &dyn AuditSink) -> CellValue {
    let converted = convert_hours_cell(cell);
    let minutes = runtime_cell_to_minutes(&converted);
    validate_runtime_range(minutes, bounds, sink).into()
}

/// Apply [`normalize_runtime_cell`] to the runtime column
pub fn normalize_runtime_column(table: &mut Table, bounds: Bounds, sink: &dyn AuditSink) -> usize {
    table.map_column(RUNTIME, |cell| normalize_runtime_cell(cell, bounds, sink))
}

/// Expand shorthand years, then range-check. Result is integer or unknown.
pub fn normalize_year_cell(
    cell: &CellValue,
    bounds: Bounds,
    check: YearRangeCheck,
    sink: &dyn AuditSink,
) -> CellValue {
    validate_year_range(expand_short_year(cell), bounds, check, sink).into()
}

/// Apply [`normalize_year_cell`] to the year column
pub fn normalize_year_column(
    table: &mut Table,
    bounds: Bounds,
    check: YearRangeCheck,
    sink: &dyn AuditSink,
) -> usize {
    table.map_column(YEAR, |cell| normalize_year_cell(cell, bounds, check, sink))
}

/// Derive `country_count` from the country column
pub fn add_country_count(table: &mut Table) {
    table.set_column(COUNTRY_COUNT, |row| {
        CellValue::Integer(count_csv_tokens(row.get(COUNTRY)))
    });
}

/// Project to exactly `columns`, in order.
///
/// # Errors
///
/// `TableError::MissingColumn` when a required column is absent.
pub fn select_columns<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Table, TableError> {
    table.select(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditLevel, MemorySink};
    use crate::models::columns::{FESTIVAL_YEAR, LINK};
    use crate::cleaning::DEFAULT_DENYLIST;
    use crate::cleaning::parsers::{RUNTIME_BOUNDS, YEAR_BOUNDS};

    fn table_of(rows: Vec<Row>) -> Table {
        rows.into_iter().collect()
    }

    fn denylist() -> Vec<String> {
        DEFAULT_DENYLIST.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_strip_whitespace_text_only() {
        let mut table = table_of(vec![
            Row::new()
                .with("genre", " Drama ")
                .with("runtime", " 93 Min")
                .with("year", CellValue::Integer(2010))
                .with("country", CellValue::Unknown),
        ]);
        assert_eq!(strip_whitespace(&mut table), 2);
        let row = &table.rows()[0];
        assert_eq!(row.get("genre"), &CellValue::text("Drama"));
        assert_eq!(row.get("runtime"), &CellValue::text("93 Min"));
        assert_eq!(row.get("year"), &CellValue::Integer(2010));
        assert!(row.get("country").is_unknown());
    }

    #[test]
    fn test_split_alternate_title_first_slash_only() {
        let mut table = table_of(vec![
            Row::new().with(FILM_TITLE, "Le Havre/Le Havre / Remix"),
            Row::new().with(FILM_TITLE, "Anonymous"),
            Row::new().with(FILM_TITLE, CellValue::Unknown),
        ]);
        assert_eq!(split_alternate_title(&mut table), 1);
        let rows = table.rows();
        assert_eq!(rows[0].get(FILM_TITLE), &CellValue::text("Le Havre"));
        assert_eq!(rows[0].get(ALT_TITLE), &CellValue::text("Le Havre / Remix"));
        assert_eq!(rows[1].get(FILM_TITLE), &CellValue::text("Anonymous"));
        assert!(rows[1].get(ALT_TITLE).is_unknown());
        assert!(rows[2].get(ALT_TITLE).is_unknown());
        assert!(table.has_column(ALT_TITLE));
    }

    #[test]
    fn test_merge_director_truth_table() {
        let a = CellValue::text("A");
        let b = CellValue::text("B");
        let unknown = CellValue::Unknown;
        assert_eq!(merge_director_cells(&a, &b), CellValue::text("A,B"));
        assert_eq!(merge_director_cells(&unknown, &b), CellValue::text("B"));
        assert_eq!(merge_director_cells(&a, &unknown), CellValue::text("A"));
        assert_eq!(merge_director_cells(&unknown, &unknown), CellValue::text(""));
    }

    #[test]
    fn test_merge_director_columns_without_directors_column() {
        let mut table = table_of(vec![Row::new().with(DIRECTOR, "Hans Van Nuffel")]);
        merge_director_columns(&mut table);
        assert_eq!(table.rows()[0].get(DIRECTOR), &CellValue::text("Hans Van Nuffel"));
    }

    #[test]
    fn test_drop_known_non_movie_rows() {
        let sink = MemorySink::new();
        let mut table = table_of(vec![
            Row::new().with(FILM_TITLE, "ZFF Masters: Terry Gilliam"),
            Row::new().with(FILM_TITLE, "Kurzfilmprogramm 2"),
            Row::new().with(FILM_TITLE, "Short Cuts vol. 3"),
            Row::new().with(FILM_TITLE, "zff masters: lower case stays"),
            Row::new().with(FILM_TITLE, "Grounding"),
            Row::new().with(FILM_TITLE, CellValue::Unknown),
        ]);
        assert_eq!(drop_known_non_movie_rows(&mut table, &denylist(), &sink), 3);
        assert_eq!(table.len(), 3);
        assert_eq!(sink.count("drop_denylisted", AuditLevel::Debug), 3);
    }

    #[test]
    fn test_deduplicate_rows_on_key_tuple() {
        let mut table = table_of(vec![
            Row::new().with(LINK, "a").with(FESTIVAL_YEAR, "2010").with("genre", "Drama"),
            Row::new().with(LINK, "a").with(FESTIVAL_YEAR, "2010").with("genre", "Other"),
            Row::new().with(LINK, "a").with(FESTIVAL_YEAR, "2011"),
            Row::new().with(LINK, "b").with(FESTIVAL_YEAR, "2010"),
            Row::new().with(LINK, "b").with(FESTIVAL_YEAR, "2010"),
        ]);
        assert_eq!(deduplicate_rows(&mut table, &[LINK, FESTIVAL_YEAR]), 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].get("genre"), &CellValue::text("Drama"));

        let once = table.clone();
        assert_eq!(deduplicate_rows(&mut table, &[LINK, FESTIVAL_YEAR]), 0);
        assert_eq!(table, once);
    }

    #[test]
    fn test_deduplicate_on_link_only() {
        let mut table = table_of(vec![
            Row::new().with(LINK, "a").with(FESTIVAL_YEAR, "2010"),
            Row::new().with(LINK, "a").with(FESTIVAL_YEAR, "2011"),
        ]);
        assert_eq!(deduplicate_rows(&mut table, &[LINK]), 1);
    }

    #[test]
    fn test_substitute_known_misspellings() {
        let terms: IndexMap<String, String> = [("USAA", "USA"), ("Spein", "Spain")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let fix = |s: &str| substitute_cell(&CellValue::text(s), &terms);
        assert_eq!(fix("USAA"), CellValue::text("USA"));
        assert_eq!(fix("Spain,Ireland"), CellValue::text("Spain,Ireland"));
        assert_eq!(fix("Mexico,Spein,Ireland"), CellValue::text("Mexico,Spain,Ireland"));
        assert_eq!(fix("Spein,USAA,Spein"), CellValue::text("Spain,USA,Spain"));
        assert!(substitute_cell(&CellValue::Unknown, &terms).is_unknown());
    }

    #[test]
    fn test_normalize_runtime_cell() {
        let sink = MemorySink::new();
        let norm = |s: &str| normalize_runtime_cell(&CellValue::text(s), RUNTIME_BOUNDS, &sink);
        assert_eq!(norm("93 Min"), CellValue::Integer(93));
        assert_eq!(norm("2 hrs 10"), CellValue::Integer(130));
        assert_eq!(norm("5000Min"), CellValue::Unknown);
        assert_eq!(norm("HRs"), CellValue::Unknown);
        assert_eq!(norm("93"), CellValue::Integer(93));
        assert_eq!(norm("about an hour"), CellValue::Unknown);
        assert!(normalize_runtime_cell(&CellValue::Unknown, RUNTIME_BOUNDS, &sink).is_unknown());
        assert_eq!(sink.count("normalize_runtime", AuditLevel::Info), 1);
    }

    #[test]
    fn test_normalize_year_column() {
        let sink = MemorySink::new();
        let mut table = table_of(vec![
            Row::new().with(YEAR, "2010.0"),
            Row::new().with(YEAR, "84"),
            Row::new().with(YEAR, CellValue::Integer(12)),
            Row::new().with(YEAR, "BB"),
            Row::new().with(YEAR, "1900"),
        ]);
        normalize_year_column(&mut table, YEAR_BOUNDS, YearRangeCheck::Inclusive, &sink);
        let years: Vec<_> = table.column(YEAR).cloned().collect();
        assert_eq!(
            years,
            vec![
                CellValue::Integer(2010),
                CellValue::Integer(1984),
                CellValue::Integer(2012),
                CellValue::Unknown,
                CellValue::Unknown,
            ]
        );
    }

    #[test]
    fn test_country_count_after_comma_strip() {
        let mut table = table_of(vec![
            Row::new().with(COUNTRY, ",Spain,Mexico"),
            Row::new().with(COUNTRY, "USA"),
            Row::new().with(COUNTRY, CellValue::Unknown),
            Row::new().with(COUNTRY, ",Australia,USA,UK,Germany"),
        ]);
        assert_eq!(strip_leading_comma(&mut table, COUNTRY), 2);
        add_country_count(&mut table);
        let counts: Vec<_> = table.column(COUNTRY_COUNT).cloned().collect();
        assert_eq!(
            counts,
            vec![
                CellValue::Integer(2),
                CellValue::Integer(1),
                CellValue::Integer(0),
                CellValue::Integer(4),
            ]
        );
    }

    #[test]
    fn test_tag_and_select() {
        let mut table = table_of(vec![Row::new().with(LINK, "a").with("genre", "Drama")]);
        tag_source_festival(&mut table, "ZFF");
        let projected = select_columns(&table, &[FESTIVAL_NAME, LINK]).unwrap();
        assert_eq!(projected.columns(), [FESTIVAL_NAME, LINK]);
        assert_eq!(projected.rows()[0].get(FESTIVAL_NAME), &CellValue::text("ZFF"));
        assert!(select_columns(&table, &[YEAR]).is_err());
    }
}
