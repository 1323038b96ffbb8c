//! Per-year raw files: write, discover, merge, clean

use festival_archive::models::columns::*;
use festival_archive::pipeline::{WranglerConfig, run_cleaning_pipeline};
use festival_archive::scrape::{
    RawMovieRecord, ScrapeError, discover_year_files, merge_year_files, write_year_file,
};
use festival_archive::tabular::Delimiter;
use festival_archive::{CellValue, MemorySink};
use tempfile::TempDir;

fn page(id: u32, title: &str, items: &[&str]) -> RawMovieRecord {
    RawMovieRecord::from_page(&format!("https://zff.com/en/archive/{id}/"), title, items)
}

fn year_2011() -> Vec<RawMovieRecord> {
    vec![
        page(
            1,
            "Le Havre/Le Havre",
            &[
                "Genre: Drama",
                "Country, Year: Finland, France, Germany, 2011",
                "Runtime: 93 Min",
                "Director: Aki Kaurismäki",
            ],
        ),
        page(
            2,
            "ZFF Talks: Cinema Now",
            &["Genre: Talk", "Country, Year: Switzerland, 2011"],
        ),
    ]
}

fn year_2012() -> Vec<RawMovieRecord> {
    vec![page(
        3,
        "Argo",
        &[
            "Genre: Thriller",
            "Country, Year: USA, 2012",
            "Runtime: 2 hrs 0",
            "Directors: Ben Affleck",
            "Languages: English",
        ],
    )]
}

#[test]
fn test_write_discover_merge_and_clean() {
    let temp = TempDir::new().unwrap();
    let prefix = format!("{}/years/data_dirty_zff_", temp.path().display());

    write_year_file(&prefix, 2012, &year_2012(), Delimiter::Csv).unwrap();
    write_year_file(&prefix, 2011, &year_2011(), Delimiter::Csv).unwrap();
    std::fs::write(temp.path().join("years").join("notes.txt"), "ignored").unwrap();

    let years = discover_year_files(&prefix).unwrap();
    assert_eq!(years, vec![2011, 2012]);

    let merged = merge_year_files(&prefix, &years, Delimiter::Csv).unwrap();
    assert_eq!(merged.len(), 3);
    let festival_years: Vec<_> = merged.column(FESTIVAL_YEAR).cloned().collect();
    assert_eq!(
        festival_years,
        vec![
            CellValue::Integer(2011),
            CellValue::Integer(2011),
            CellValue::Integer(2012)
        ]
    );
    assert!(merged.has_column(DIRECTORS));
    assert!(merged.has_column(LANGUAGES));

    let config = WranglerConfig::default();
    let (staged, _) = run_cleaning_pipeline(merged, &config, &MemorySink::new()).unwrap();
    assert_eq!(staged.len(), 2);

    let havre = &staged.rows()[0];
    assert_eq!(havre.get(FILM_TITLE), &CellValue::text("Le Havre"));
    assert_eq!(havre.get(COUNTRY), &CellValue::text("Finland,France,Germany"));
    assert_eq!(havre.get(COUNTRY_COUNT), &CellValue::Integer(3));
    assert_eq!(havre.get(YEAR), &CellValue::Integer(2011));
    assert_eq!(havre.get(RUNTIME), &CellValue::Integer(93));
    assert_eq!(havre.get(DIRECTOR), &CellValue::text("Aki Kaurismäki"));

    let argo = &staged.rows()[1];
    assert_eq!(argo.get(DIRECTOR), &CellValue::text("Ben Affleck"));
    assert_eq!(argo.get(RUNTIME), &CellValue::Integer(120));
    assert_eq!(argo.get(COUNTRY_COUNT), &CellValue::Integer(1));
    assert_eq!(argo.get(FESTIVAL_YEAR), &CellValue::Integer(2012));
}

#[test]
fn test_merge_rejects_bad_years_and_missing_files() {
    let temp = TempDir::new().unwrap();
    let prefix = format!("{}/data_dirty_zff_", temp.path().display());

    let err = merge_year_files(&prefix, &[2004], Delimiter::Csv).unwrap_err();
    assert!(matches!(err, ScrapeError::FestivalYearOutOfRange { year: 2004, .. }));
    assert!(err.user_message().contains("Hint:"));

    let err = merge_year_files(&prefix, &[2015], Delimiter::Csv).unwrap_err();
    assert!(matches!(err, ScrapeError::MissingYearFile { year: 2015, .. }));
}
