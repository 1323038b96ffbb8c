//! Error types for dirty-data generation

use thiserror::Error;

/// Errors raised by the corruption transforms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorruptionError {
    /// Sampling ratio outside `[0, 1]`
    #[error("Invalid ratio {ratio} for '{stage}': expected a value between 0 and 1")]
    InvalidRatio { stage: String, ratio: f64 },

    /// Outlier range with `min > max`
    #[error("Invalid outlier range {min}..={max}")]
    InvalidOutlierRange { min: i64, max: i64 },
}

impl CorruptionError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CorruptionError::InvalidRatio { stage, ratio } => format!(
                "Invalid ratio {ratio} for '{stage}'\n\nHint: Ratios in the [corruption] section must lie between 0.0 and 1.0."
            ),
            CorruptionError::InvalidOutlierRange { .. } => format!(
                "{self}\n\nHint: Set outlier_range = {{ min = .., max = .. }} with min <= max."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_ratio_display() {
        let err = CorruptionError::InvalidRatio {
            stage: "inject_duplicates".to_string(),
            ratio: 1.5,
        };
        assert!(err.to_string().contains("1.5"));
        assert!(err.user_message().contains("Hint:"));
    }
}
