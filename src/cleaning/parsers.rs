//! Single-cell parsers
//!
//! Each parser turns one raw value into a normalized value or `None` for
//! "unknown". Malformed input is data, not a fault: nothing here returns an
//! error. Range checks report rejected values to the audit sink.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::audit::AuditSink;
use crate::models::CellValue;

/// Shorthand years at or above this pivot belong to the 1900s, below it to the 2000s
pub const SHORT_YEAR_PIVOT: i64 = 20;

/// "93 Min", "93min", "5000Min"
static MINUTES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*([+-]?\d+)\s*min\s*$").unwrap());

/// "2 hrs 10", "2HRs10"
static HOURS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([+-]?\d+)\s*hrs\s*([+-]?\d+)\s*$").unwrap()
});

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

/// Plausible film length in minutes
pub const RUNTIME_BOUNDS: Bounds = Bounds::new(2, 400);

/// Plausible production year
pub const YEAR_BOUNDS: Bounds = Bounds::new(1930, 2020);

/// How the year range check behaves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearRangeCheck {
    /// Years outside the bounds become unknown
    #[default]
    Inclusive,
    /// `year > max && year < min`: can never reject, every year passes
    Legacy,
}

impl std::str::FromStr for YearRangeCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inclusive" => Ok(YearRangeCheck::Inclusive),
            "legacy" => Ok(YearRangeCheck::Legacy),
            _ => Err(format!(
                "Invalid year range check: {}. Expected: inclusive, legacy",
                s
            )),
        }
    }
}

/// Parse a runtime in any of the accepted shapes into total minutes.
///
/// Accepts `"<n> Min"` (unit case-insensitive, space optional), `"<h> hrs <m>"`
/// and a bare integer. Anything else is `None`.
pub fn parse_runtime_to_minutes(text: &str) -> Option<i64> {
    if let Some(caps) = MINUTES_REGEX.captures(text) {
        return caps[1].parse().ok();
    }
    if let Some(minutes) = hours_to_minutes(text) {
        return Some(minutes);
    }
    text.trim().parse().ok()
}

/// Parse only the `"<h> hrs <m>"` shape into total minutes
pub fn hours_to_minutes(text: &str) -> Option<i64> {
    let caps = HOURS_REGEX.captures(text)?;
    let hours: i64 = caps[1].parse().ok()?;
    let minutes: i64 = caps[2].parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Render minutes in the `"<h> hrs <m>"` shape; inverse of [`hours_to_minutes`]
pub fn render_minutes_as_hours(minutes: i64) -> String {
    format!("{} hrs {}", minutes.div_euclid(60), minutes.rem_euclid(60))
}

/// Rewrite an hours-shaped runtime cell as `"<n> Min"`.
///
/// Cells that do not mention "hrs" pass through. A cell that mentions "hrs"
/// but cannot be read becomes unknown.
pub fn convert_hours_cell(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Text(text) if text.to_lowercase().contains("hrs") => {
            match hours_to_minutes(text) {
                Some(minutes) => CellValue::Text(format!("{minutes} Min")),
                None => CellValue::Unknown,
            }
        }
        other => other.clone(),
    }
}

/// Strip the minutes unit and read the runtime as an integer
pub fn runtime_cell_to_minutes(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Text(text) => parse_runtime_to_minutes(text),
        other => other.as_integer(),
    }
}

/// Keep runtimes inside `bounds`, map everything else to unknown
pub fn validate_runtime_range(
    minutes: Option<i64>,
    bounds: Bounds,
    sink: &dyn AuditSink,
) -> Option<i64> {
    let minutes = minutes?;
    if bounds.contains(minutes) {
        Some(minutes)
    } else {
        sink.info(
            "normalize_runtime",
            &format!("Outlier '{minutes}' in 'runtime' found - setting it to unknown"),
        );
        None
    }
}

/// Expand a two-digit year.
///
/// Values above 99 are returned unchanged; `20..=99` map to the 1900s and
/// `0..=19` to the 2000s. Negative or non-numeric input is `None`.
pub fn expand_short_year(cell: &CellValue) -> Option<i64> {
    let year = cell.as_integer()?;
    match year {
        y if y > 99 => Some(y),
        y if y >= SHORT_YEAR_PIVOT => Some(1900 + y),
        y if y >= 0 => Some(2000 + y),
        _ => None,
    }
}

/// Apply the configured year range check
pub fn validate_year_range(
    year: Option<i64>,
    bounds: Bounds,
    check: YearRangeCheck,
    sink: &dyn AuditSink,
) -> Option<i64> {
    let year = year?;
    let reject = match check {
        YearRangeCheck::Inclusive => !bounds.contains(year),
        YearRangeCheck::Legacy => year > bounds.max && year < bounds.min,
    };
    if reject {
        sink.info(
            "normalize_year",
            &format!("Year '{year}' outside {}-{} - setting it to unknown", bounds.min, bounds.max),
        );
        None
    } else {
        Some(year)
    }
}

/// Count comma-separated tokens, raw: a leading comma adds an empty token.
/// Unknown and empty cells count as zero.
pub fn count_csv_tokens(cell: &CellValue) -> i64 {
    match cell {
        CellValue::Unknown => 0,
        CellValue::Text(text) if text.is_empty() => 0,
        other => other.to_string().split(',').count() as i64,
    }
}

/// Drop one leading comma from a text cell
pub fn strip_leading_comma(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Text(text) => match text.strip_prefix(',') {
            Some(rest) => CellValue::text(rest),
            None => cell.clone(),
        },
        other => other.clone(),
    }
}
