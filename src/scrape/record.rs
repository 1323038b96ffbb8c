//! Raw per-movie records built from the info list on a movie page

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::columns::{COUNTRY, FILM_TITLE, LINK};
use crate::models::{CellValue, Row};

/// Split one info-list item into a lower-cased key and its verbatim value.
///
/// Line breaks are removed and the item trimmed first; the split is on the
/// first `:` only. Items without a `:` are not key/value pairs.
pub fn parse_info_item(item: &str) -> Option<(String, String)> {
    let flat: String = item.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    let (key, value) = flat.trim().split_once(':')?;
    Some((key.to_lowercase(), value.to_string()))
}

/// Split a combined "Country, Year" item into its two fields.
///
/// With several countries the value is `"USA, UK, 2015"`: every part but the
/// last is trimmed and joined as `",USA,UK"` and the last part is the year.
/// A single country with a year maps one to one. A key without a comma is
/// kept as a single field.
pub fn split_country_year(key: &str, value: &str) -> Vec<(String, String)> {
    let Some((country_key, year_key)) = key.split_once(',') else {
        return vec![(key.trim().to_lowercase(), value.trim().to_string())];
    };
    let country_key = country_key.trim().to_lowercase();
    let year_key = year_key.trim().to_lowercase();

    let values: Vec<&str> = value.split(',').collect();
    match values.as_slice() {
        [country] => vec![(country_key, country.trim().to_string())],
        [country, year] => vec![
            (country_key, country.trim().to_string()),
            (year_key, year.trim().to_string()),
        ],
        [countries @ .., year] => {
            let joined: String = countries.iter().map(|c| format!(",{}", c.trim())).collect();
            vec![(country_key, joined), (year_key, year.trim().to_string())]
        }
        [] => Vec::new(),
    }
}

/// Fields scraped from one movie page, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMovieRecord {
    pub fields: IndexMap<String, String>,
}

impl RawMovieRecord {
    /// Build a record from a page's title, info-list items and URL
    pub fn from_page<I, S>(link: &str, title: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields = IndexMap::new();
        fields.insert(FILM_TITLE.to_string(), title.trim().to_string());

        for item in items {
            let Some((key, value)) = parse_info_item(item.as_ref()) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            if key.contains(COUNTRY) {
                fields.extend(split_country_year(&key, &value));
            } else {
                fields.insert(key, value);
            }
        }

        fields.insert(LINK.to_string(), link.to_string());
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Convert to a table row. Empty values become unknown.
    pub fn to_row(&self) -> Row {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), CellValue::from_raw(v)))
            .collect()
    }
}
