//! Dirty-then-clean recovery
//!
//! Misspellings, year shorthand and hours-formatted runtimes injected by the
//! corruption pipeline must come back out of the cleaning pipeline as the
//! original values. Runtime outliers are unrecoverable: they clean to unknown.

use std::collections::HashMap;

use festival_archive::models::columns::*;
use festival_archive::pipeline::{WranglerConfig, clean_file, dirty_file};
use festival_archive::tabular::{Delimiter, read_table, write_table};
use festival_archive::{CellValue, MemorySink, Row, Table};
use tempfile::TempDir;

const COUNTRIES: [&str; 6] = [
    "Spain",
    "USA",
    ",Spain,Mexico",
    ",USA,UK",
    "Switzerland",
    ",Spain,USA,France",
];

fn source_table(n: usize) -> Table {
    (0..n)
        .map(|i| {
            Row::new()
                .with(LINK, format!("https://zff.com/en/archive/{i}/"))
                .with(FILM_TITLE, format!("Film {i}"))
                .with(GENRE, "Drama")
                .with(COUNTRY, COUNTRIES[i % COUNTRIES.len()])
                .with(RUNTIME, format!("{} Min", 60 + (i * 7) % 120))
                .with(LANGUAGES, "English")
                .with(SUBTITLES, "German")
                .with(DIRECTOR, format!("Director {i}"))
                .with(FESTIVAL_YEAR, format!("{}", 2005 + i % 15))
                .with(YEAR, format!("{}.0", 1960 + i % 61))
        })
        .collect()
}

fn by_link(table: &Table) -> HashMap<String, Row> {
    table
        .rows()
        .iter()
        .map(|row| (row.get(LINK).to_string(), row.clone()))
        .collect()
}

#[test]
fn test_dirty_then_clean_recovers_injected_values() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("data_zff_src.csv");
    let dirty = temp.path().join("data_zff_src_dirty.csv");
    let expected_stage = temp.path().join("expected_stage.csv");
    let stage = temp.path().join("data_zff_stage.csv");

    write_table(&src, &source_table(200), Delimiter::Csv).unwrap();

    let mut config = WranglerConfig::default().with_seed(2021);
    config.corruption.runtime_format_ratio = 0.3;
    config.corruption.year_shorthand_ratio = 0.4;
    config.corruption.runtime_outlier_ratio = 0.05;
    let sink = MemorySink::new();

    clean_file(&src, &expected_stage, &config, &sink).unwrap();
    let dirty_report = dirty_file(&src, &dirty, &config, &sink).unwrap();
    assert_eq!(dirty_report.rows_out, 200 + 2 * 20);

    let dirty_table = read_table(&dirty, Delimiter::Csv).unwrap();
    assert!(dirty_table.column(COUNTRY).any(|c| c.to_string().contains("Spein")));
    assert!(dirty_table.column(RUNTIME).any(|c| c.to_string().contains("hrs")));

    let clean_report = clean_file(&dirty, &stage, &config, &sink).unwrap();
    assert_eq!(clean_report.stage("deduplicate").unwrap().row_delta(), -40);

    let expected = read_table(&expected_stage, Delimiter::Csv).unwrap();
    let recovered = read_table(&stage, Delimiter::Csv).unwrap();
    assert_eq!(recovered.columns(), expected.columns());
    assert_eq!(recovered.len(), expected.len());

    // 2020 has no recoverable two-digit form, so it is never shortened
    let year_2020 = |table: &Table| {
        table
            .column(YEAR)
            .filter(|c| c.as_integer() == Some(2020))
            .count()
    };
    assert!(year_2020(&expected) > 0);
    assert_eq!(year_2020(&recovered), year_2020(&expected));
    assert!(dirty_table.column(YEAR).all(|c| c.as_integer() != Some(20)));

    let expected = by_link(&expected);
    let mut lost_runtimes = 0;
    for row in recovered.rows() {
        let original = &expected[&row.get(LINK).to_string()];
        for column in recovered.columns() {
            if column == RUNTIME && row.get(RUNTIME).is_unknown() {
                lost_runtimes += 1;
                continue;
            }
            assert_eq!(
                row.get(column),
                original.get(column),
                "column {column} of {}",
                row.get(LINK)
            );
        }
    }

    let outliers = dirty_report
        .stage("runtime_outliers")
        .unwrap()
        .cells_changed
        .unwrap();
    assert!(outliers > 0);
    assert!(lost_runtimes <= outliers);
}

#[test]
fn test_clean_output_has_no_leftover_dirt() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src.csv");
    let dirty = temp.path().join("dirty.csv");
    let stage = temp.path().join("stage.csv");
    write_table(&src, &source_table(120), Delimiter::Csv).unwrap();

    let config = WranglerConfig::default().with_seed(5);
    let sink = MemorySink::new();
    dirty_file(&src, &dirty, &config, &sink).unwrap();
    clean_file(&dirty, &stage, &config, &sink).unwrap();

    let staged = read_table(&stage, Delimiter::Csv).unwrap();
    for row in staged.rows() {
        let country = row.get(COUNTRY).to_string();
        assert!(!country.starts_with(','));
        assert!(!country.contains("Spein") && !country.contains("USAA"));

        let expected_count = country.split(',').count().to_string();
        assert_eq!(row.get(COUNTRY_COUNT), &CellValue::text(expected_count));

        if let Some(year) = row.get(YEAR).as_integer() {
            assert!((1930..=2020).contains(&year));
        }
        if let Some(runtime) = row.get(RUNTIME).as_integer() {
            assert!((2..=400).contains(&runtime));
        }
        assert_eq!(row.get(FESTIVAL_NAME), &CellValue::text("ZFF"));
    }
}
