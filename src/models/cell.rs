//! Cell values
//!
//! A cell is text, an integer, a float or `Unknown`. `Unknown` is a first-class
//! value rather than an empty string or a "NaN" marker: every transform passes it
//! through untouched unless the transform exists to fill it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Free text, as scraped
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Missing or unparsable
    #[default]
    Unknown,
}

pub(crate) static UNKNOWN: CellValue = CellValue::Unknown;

impl CellValue {
    /// Build a cell from a raw delimited-file field.
    ///
    /// Empty fields are `Unknown`; everything else is kept as text. Numeric columns
    /// are coerced later by the cleaning parsers, never on read.
    pub fn from_raw(raw: &str) -> Self {
        if raw.is_empty() {
            CellValue::Unknown
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    /// Shorthand for a text cell
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, CellValue::Unknown)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the cell as a whole number.
    ///
    /// Accepts integers, floats without a fractional part, and text holding either
    /// (surrounding whitespace allowed). Returns `None` for anything else.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(*v),
            CellValue::Float(v) => float_to_integer(*v),
            CellValue::Text(s) => parse_integer_like(s),
            CellValue::Unknown => None,
        }
    }

    /// Key used for equality on duplicate detection; `Unknown` compares equal to itself.
    pub fn dedup_key(&self) -> Option<String> {
        match self {
            CellValue::Unknown => None,
            other => Some(other.to_string()),
        }
    }

    /// Field text for delimited output. `Unknown` is written as an empty field.
    pub fn to_field(&self) -> String {
        match self {
            CellValue::Unknown => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(v) => write!(f, "{v}"),
            CellValue::Float(v) => match float_to_integer(*v) {
                Some(whole) => write!(f, "{whole}"),
                None => write!(f, "{v}"),
            },
            CellValue::Unknown => write!(f, "unknown"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Unknown, Into::into)
    }
}

fn float_to_integer(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Parse "2010", " 2010 " or "2010.0" as a whole number.
pub(crate) fn parse_integer_like(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    trimmed.parse::<f64>().ok().and_then(float_to_integer)
}
