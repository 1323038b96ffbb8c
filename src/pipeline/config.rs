//! Pipeline configuration types

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cleaning::{
    Bounds, DEFAULT_DENYLIST, DEFAULT_FESTIVAL_TAG, DEFAULT_KNOWN_TERMS, RUNTIME_BOUNDS,
    YEAR_BOUNDS, YearRangeCheck,
};
use crate::corruption::OUTLIER_RANGE;
use crate::models::columns::{COUNTRY, FESTIVAL_YEAR, LINK, STAGE_COLUMNS};
use crate::tabular::Delimiter;

/// Main configuration shared by the cleaning and dirty-data pipelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WranglerConfig {
    /// Value written into `festival_name`
    pub festival_tag: String,
    /// Misspelling to correction, applied to `country` in order
    pub known_terms: IndexMap<String, String>,
    /// Title prefixes of rows that are not films
    pub denylist: Vec<String>,
    pub runtime_bounds: Bounds,
    pub year_bounds: Bounds,
    pub year_range_check: YearRangeCheck,
    /// Key tuple for duplicate removal
    pub dedup_columns: Vec<String>,
    /// Staged table projection, in output order
    pub output_columns: Vec<String>,
    pub delimiter: Delimiter,
    pub corruption: CorruptionConfig,
    pub paths: PathsConfig,
}

impl Default for WranglerConfig {
    fn default() -> Self {
        Self {
            festival_tag: DEFAULT_FESTIVAL_TAG.to_string(),
            known_terms: DEFAULT_KNOWN_TERMS
                .iter()
                .map(|(wrong, right)| (wrong.to_string(), right.to_string()))
                .collect(),
            denylist: DEFAULT_DENYLIST.iter().map(ToString::to_string).collect(),
            runtime_bounds: RUNTIME_BOUNDS,
            year_bounds: YEAR_BOUNDS,
            year_range_check: YearRangeCheck::default(),
            dedup_columns: vec![LINK.to_string(), FESTIVAL_YEAR.to_string()],
            output_columns: STAGE_COLUMNS.iter().map(ToString::to_string).collect(),
            delimiter: Delimiter::default(),
            corruption: CorruptionConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl WranglerConfig {
    /// Create a config with every default
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a TOML config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Set the festival tag
    pub fn with_festival_tag(mut self, tag: impl Into<String>) -> Self {
        self.festival_tag = tag.into();
        self
    }

    /// Set the year range check
    pub fn with_year_range_check(mut self, check: YearRangeCheck) -> Self {
        self.year_range_check = check;
        self
    }

    /// Set the output projection
    pub fn with_output_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the dirty-data configuration
    pub fn with_corruption(mut self, corruption: CorruptionConfig) -> Self {
        self.corruption = corruption;
        self
    }

    /// Set the sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.corruption.seed = Some(seed);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.runtime_bounds.is_valid() {
            return Err(format!(
                "runtime_bounds min {} is above max {}",
                self.runtime_bounds.min, self.runtime_bounds.max
            ));
        }
        if !self.year_bounds.is_valid() {
            return Err(format!(
                "year_bounds min {} is above max {}",
                self.year_bounds.min, self.year_bounds.max
            ));
        }
        if self.output_columns.is_empty() {
            return Err("output_columns must name at least one column".to_string());
        }
        if self.dedup_columns.is_empty() {
            return Err("dedup_columns must name at least one column".to_string());
        }
        self.corruption.validate()
    }
}

/// One misspelling injected by the dirty-data pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Misspelling {
    /// Real value to look for
    pub value: String,
    /// Replacement written into sampled cells
    pub misspelled: String,
    pub ratio: f64,
    #[serde(default = "default_misspelling_column")]
    pub column: String,
}

fn default_misspelling_column() -> String {
    COUNTRY.to_string()
}

impl Misspelling {
    pub fn new(value: impl Into<String>, misspelled: impl Into<String>, ratio: f64) -> Self {
        Self {
            value: value.into(),
            misspelled: misspelled.into(),
            ratio,
            column: default_misspelling_column(),
        }
    }
}

/// Ratios and ranges for dirty-data generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionConfig {
    /// Fixed seed for reproducible output; random when unset
    pub seed: Option<u64>,
    pub misspellings: Vec<Misspelling>,
    pub runtime_format_ratio: f64,
    pub year_shorthand_ratio: f64,
    pub duplicate_ratio: f64,
    pub runtime_outlier_ratio: f64,
    pub outlier_range: Bounds,
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            misspellings: vec![
                Misspelling::new("Spain", "Spein", 0.5),
                Misspelling::new("USA", "USAA", 0.1),
            ],
            runtime_format_ratio: 0.10,
            year_shorthand_ratio: 0.20,
            duplicate_ratio: 0.10,
            runtime_outlier_ratio: 0.01,
            outlier_range: OUTLIER_RANGE,
        }
    }
}

impl CorruptionConfig {
    /// Validate ratios and the outlier range
    pub fn validate(&self) -> Result<(), String> {
        let ratios = self
            .misspellings
            .iter()
            .map(|m| (format!("misspelling '{}'", m.value), m.ratio))
            .chain([
                ("runtime_format_ratio".to_string(), self.runtime_format_ratio),
                ("year_shorthand_ratio".to_string(), self.year_shorthand_ratio),
                ("duplicate_ratio".to_string(), self.duplicate_ratio),
                ("runtime_outlier_ratio".to_string(), self.runtime_outlier_ratio),
            ]);
        for (name, ratio) in ratios {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(format!("{name} ratio {ratio} is outside 0.0-1.0"));
            }
        }
        if !self.outlier_range.is_valid() {
            return Err(format!(
                "outlier_range min {} is above max {}",
                self.outlier_range.min, self.outlier_range.max
            ));
        }
        Ok(())
    }
}

/// Default file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Merged raw table
    pub source: PathBuf,
    /// Raw table with injected dirt
    pub dirty: PathBuf,
    /// Cleaned, projected table
    pub stage: PathBuf,
    /// Per-year raw files are `<prefix><year>.csv`
    pub year_file_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("data/data_zff_src.csv"),
            dirty: PathBuf::from("data/data_zff_src_dirty.csv"),
            stage: PathBuf::from("data/data_zff_stage.csv"),
            year_file_prefix: "data/years/data_dirty_zff_".to_string(),
        }
    }
}

/// Cleaning stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    SplitAlternateTitle,
    StripWhitespace,
    MergeDirectors,
    TagFestival,
    DropDenylisted,
    Deduplicate,
    FixMisspellings,
    NormalizeYear,
    StripCountryComma,
    CountryCount,
    NormalizeRuntime,
    SelectColumns,
}

impl CleaningStage {
    /// Get all stages in execution order
    pub fn all() -> Vec<Self> {
        vec![
            Self::SplitAlternateTitle,
            Self::StripWhitespace,
            Self::MergeDirectors,
            Self::TagFestival,
            Self::DropDenylisted,
            Self::Deduplicate,
            Self::FixMisspellings,
            Self::NormalizeYear,
            Self::StripCountryComma,
            Self::CountryCount,
            Self::NormalizeRuntime,
            Self::SelectColumns,
        ]
    }

    /// Get stage name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SplitAlternateTitle => "split_alternate_title",
            Self::StripWhitespace => "strip_whitespace",
            Self::MergeDirectors => "merge_directors",
            Self::TagFestival => "tag_festival",
            Self::DropDenylisted => "drop_denylisted",
            Self::Deduplicate => "deduplicate",
            Self::FixMisspellings => "fix_misspellings",
            Self::NormalizeYear => "normalize_year",
            Self::StripCountryComma => "strip_country_comma",
            Self::CountryCount => "country_count",
            Self::NormalizeRuntime => "normalize_runtime",
            Self::SelectColumns => "select_columns",
        }
    }

    /// Get stage description
    pub fn description(&self) -> &'static str {
        match self {
            Self::SplitAlternateTitle => "Split 'Title/Alternate' into film_title and alt_title",
            Self::StripWhitespace => "Trim whitespace from every text cell",
            Self::MergeDirectors => "Merge the director and directors columns",
            Self::TagFestival => "Tag every row with the festival name",
            Self::DropDenylisted => "Drop programme blocks, talks and concerts",
            Self::Deduplicate => "Drop repeated rows on the dedup key",
            Self::FixMisspellings => "Correct known misspellings in country",
            Self::NormalizeYear => "Expand shorthand years and range-check",
            Self::StripCountryComma => "Drop the leading comma in country",
            Self::CountryCount => "Derive country_count from country",
            Self::NormalizeRuntime => "Convert runtimes to minutes and range-check",
            Self::SelectColumns => "Project to the output columns",
        }
    }

    /// Get stage index (1-based)
    pub fn index(&self) -> usize {
        match self {
            Self::SplitAlternateTitle => 1,
            Self::StripWhitespace => 2,
            Self::MergeDirectors => 3,
            Self::TagFestival => 4,
            Self::DropDenylisted => 5,
            Self::Deduplicate => 6,
            Self::FixMisspellings => 7,
            Self::NormalizeYear => 8,
            Self::StripCountryComma => 9,
            Self::CountryCount => 10,
            Self::NormalizeRuntime => 11,
            Self::SelectColumns => 12,
        }
    }
}

impl std::fmt::Display for CleaningStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for CleaningStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::all()
            .into_iter()
            .find(|stage| stage.name() == wanted || stage.index().to_string() == wanted)
            .ok_or_else(|| format!("Unknown cleaning stage: {}", s))
    }
}

/// Dirty-data stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionStage {
    Misspellings,
    RuntimeFormat,
    YearShorthand,
    Duplicates,
    RuntimeOutliers,
}

impl CorruptionStage {
    /// Get all stages in execution order
    pub fn all() -> Vec<Self> {
        vec![
            Self::Misspellings,
            Self::RuntimeFormat,
            Self::YearShorthand,
            Self::Duplicates,
            Self::RuntimeOutliers,
        ]
    }

    /// Get stage name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Misspellings => "misspellings",
            Self::RuntimeFormat => "runtime_format",
            Self::YearShorthand => "year_shorthand",
            Self::Duplicates => "duplicates",
            Self::RuntimeOutliers => "runtime_outliers",
        }
    }

    /// Get stage description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Misspellings => "Misspell a share of configured values",
            Self::RuntimeFormat => "Rewrite a share of runtimes as '<h> hrs <m>'",
            Self::YearShorthand => "Shorten a share of years to two digits",
            Self::Duplicates => "Append a share of rows twice",
            Self::RuntimeOutliers => "Replace a share of runtimes with outliers",
        }
    }

    /// Get stage index (1-based)
    pub fn index(&self) -> usize {
        match self {
            Self::Misspellings => 1,
            Self::RuntimeFormat => 2,
            Self::YearShorthand => 3,
            Self::Duplicates => 4,
            Self::RuntimeOutliers => 5,
        }
    }
}

impl std::fmt::Display for CorruptionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for CorruptionStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "misspellings" | "1" => Ok(Self::Misspellings),
            "runtime_format" | "2" => Ok(Self::RuntimeFormat),
            "year_shorthand" | "3" => Ok(Self::YearShorthand),
            "duplicates" | "4" => Ok(Self::Duplicates),
            "runtime_outliers" | "5" => Ok(Self::RuntimeOutliers),
            _ => Err(format!("Unknown corruption stage: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrangler_config_default() {
        let config = WranglerConfig::default();
        assert_eq!(config.festival_tag, "ZFF");
        assert_eq!(config.known_terms.get("USAA").map(String::as_str), Some("USA"));
        assert_eq!(config.known_terms.get_index(1).map(|(k, _)| k.as_str()), Some("Spein"));
        assert_eq!(config.runtime_bounds, Bounds::new(2, 400));
        assert_eq!(config.year_range_check, YearRangeCheck::Inclusive);
        assert_eq!(config.dedup_columns, vec!["link", "festival_year"]);
        assert_eq!(config.output_columns.len(), 11);
        assert_eq!(config.corruption.misspellings.len(), 2);
        assert!(config.denylist.iter().any(|p| p == "Short Cuts vol."));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_toml() {
        let config = WranglerConfig::from_toml_str(
            r#"
            year_range_check = "legacy"

            [corruption]
            seed = 42
            duplicate_ratio = 0.25

            [paths]
            stage = "out/stage.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.year_range_check, YearRangeCheck::Legacy);
        assert_eq!(config.corruption.seed, Some(42));
        assert_eq!(config.corruption.duplicate_ratio, 0.25);
        assert_eq!(config.corruption.runtime_outlier_ratio, 0.01);
        assert_eq!(config.paths.stage, PathBuf::from("out/stage.csv"));
        assert_eq!(config.paths.source, PathBuf::from("data/data_zff_src.csv"));
        assert_eq!(config.festival_tag, "ZFF");
    }

    #[test]
    fn test_config_validation() {
        let config = WranglerConfig::from_toml_str("[corruption]\nduplicate_ratio = 1.5\n");
        assert!(matches!(config, Err(ConfigError::Invalid(_))));

        let config = WranglerConfig::from_toml_str("year_bounds = { min = 2020, max = 1930 }\n");
        assert!(matches!(config, Err(ConfigError::Invalid(_))));

        let config = WranglerConfig::new().with_output_columns(Vec::<String>::new());
        assert!(config.validate().is_err());

        assert!(matches!(
            WranglerConfig::from_toml_str("festival_tag = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_misspellings_from_toml() {
        let config = WranglerConfig::from_toml_str(
            r#"
            [[corruption.misspellings]]
            value = "Germany"
            misspelled = "Germnay"
            ratio = 0.3
            "#,
        )
        .unwrap();
        assert_eq!(
            config.corruption.misspellings,
            vec![Misspelling::new("Germany", "Germnay", 0.3)]
        );
    }

    #[test]
    fn test_cleaning_stage_order_and_parse() {
        let stages = CleaningStage::all();
        assert_eq!(stages.len(), 12);
        assert_eq!(stages[0], CleaningStage::SplitAlternateTitle);
        assert_eq!(stages[11], CleaningStage::SelectColumns);
        assert_eq!(CleaningStage::NormalizeRuntime.index(), 11);
        for (pos, stage) in stages.iter().enumerate() {
            assert_eq!(stage.index(), pos + 1, "index of {stage}");
        }
        for (pos, stage) in CorruptionStage::all().iter().enumerate() {
            assert_eq!(stage.index(), pos + 1, "index of {stage}");
        }
        assert!(CleaningStage::StripCountryComma.index() < CleaningStage::CountryCount.index());
        assert!(CleaningStage::StripWhitespace.index() < CleaningStage::DropDenylisted.index());
        assert_eq!(
            "deduplicate".parse::<CleaningStage>().unwrap(),
            CleaningStage::Deduplicate
        );
        assert_eq!("1".parse::<CleaningStage>().unwrap(), CleaningStage::SplitAlternateTitle);
        assert!("invalid".parse::<CleaningStage>().is_err());
    }

    #[test]
    fn test_corruption_stage_parse() {
        assert_eq!(CorruptionStage::all().len(), 5);
        assert_eq!(
            "duplicates".parse::<CorruptionStage>().unwrap(),
            CorruptionStage::Duplicates
        );
        assert_eq!("5".parse::<CorruptionStage>().unwrap(), CorruptionStage::RuntimeOutliers);
        assert!("typos".parse::<CorruptionStage>().is_err());
    }
}
