//! Thresholds and sizes used by column analysis

use serde::{Deserialize, Serialize};

use crate::DataError;

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of leading non-empty values inspected per column
    pub sample_size: usize,

    /// Fraction of sampled values that must parse as dates
    pub datetime_threshold: f64,

    /// Fraction of sampled values that must parse as numbers
    pub numeric_threshold: f64,

    /// A date value must be longer than this many characters
    pub datetime_min_len: usize,

    /// Histogram bin count
    pub bin_count: usize,

    /// Categories kept for bar charts
    pub top_categories: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            datetime_threshold: 0.6,
            numeric_threshold: 0.7,
            datetime_min_len: 4,
            bin_count: 10,
            top_categories: 10,
        }
    }
}

impl AnalysisConfig {
    /// Check that sizes are positive and thresholds lie in `(0, 1]`
    pub fn validate(&self) -> Result<(), DataError> {
        if self.sample_size == 0 {
            return Err(DataError::InvalidConfig("sample_size must be positive".into()));
        }
        if self.bin_count == 0 {
            return Err(DataError::InvalidConfig("bin_count must be positive".into()));
        }
        for (name, value) in [
            ("datetime_threshold", self.datetime_threshold),
            ("numeric_threshold", self.numeric_threshold),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(DataError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
