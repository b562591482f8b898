//! Column type inference from sampled values

pub mod values;

use da_core::Dataset;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
pub use values::{parse_datetime, parse_numeric};

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Datetime,
}

/// Classifies columns by sampling their non-empty values.
///
/// The datetime check always runs before the numeric check, so a column of
/// dates like `2020-01-01` is never mistaken for numbers.
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    sample_size: usize,
    datetime_threshold: f64,
    numeric_threshold: f64,
    datetime_min_len: usize,
}

impl ColumnClassifier {
    /// Create a classifier with the default thresholds
    pub fn new() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            sample_size: config.sample_size,
            datetime_threshold: config.datetime_threshold,
            numeric_threshold: config.numeric_threshold,
            datetime_min_len: config.datetime_min_len,
        }
    }

    /// Set the sample size for classification
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size.max(1);
        self
    }

    /// Classify one column of a dataset.
    ///
    /// Returns `None` when the column has no non-empty values; such columns
    /// are left out of the analysis.
    pub fn classify(&self, column: &str, dataset: &Dataset) -> Option<ColumnKind> {
        let sample: Vec<&str> = dataset
            .present_values(column)
            .take(self.sample_size)
            .collect();

        if sample.is_empty() {
            debug!("Column '{}' has no values, skipping", column);
            return None;
        }

        let kind = self.classify_values(&sample);
        debug!("Column '{}' classified as {:?} from {} samples", column, kind, sample.len());
        Some(kind)
    }

    /// Classify a non-empty slice of sampled values
    pub fn classify_values(&self, sample: &[&str]) -> ColumnKind {
        let sample = &sample[..sample.len().min(self.sample_size)];
        if sample.is_empty() {
            return ColumnKind::Categorical;
        }

        if self.is_datetime(sample) {
            ColumnKind::Datetime
        } else if self.is_numeric(sample) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    fn is_datetime(&self, sample: &[&str]) -> bool {
        let dates = sample
            .iter()
            .filter(|v| v.chars().count() > self.datetime_min_len && parse_datetime(v).is_some())
            .count();
        meets(dates, sample.len(), self.datetime_threshold)
    }

    fn is_numeric(&self, sample: &[&str]) -> bool {
        let numbers = sample.iter().filter(|v| parse_numeric(v).is_some()).count();
        meets(numbers, sample.len(), self.numeric_threshold)
    }
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn meets(count: usize, total: usize, threshold: f64) -> bool {
    total > 0 && count as f64 / total as f64 >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse_csv;

    #[test]
    fn test_numeric_columns() {
        let ds = parse_csv("a,b\n1,2\n3,4\n");
        let classifier = ColumnClassifier::new();
        assert_eq!(classifier.classify("a", &ds), Some(ColumnKind::Numeric));
        assert_eq!(classifier.classify("b", &ds), Some(ColumnKind::Numeric));
    }

    #[test]
    fn test_datetime_column() {
        let ds = parse_csv("name,joined\nAda,2020-01-01\nGrace,2021-06-15\n");
        let classifier = ColumnClassifier::new();
        assert_eq!(classifier.classify("joined", &ds), Some(ColumnKind::Datetime));
        assert_eq!(classifier.classify("name", &ds), Some(ColumnKind::Categorical));
    }

    #[test]
    fn test_datetime_checked_before_numeric() {
        // Every value also strip-parses as a number
        let classifier = ColumnClassifier::new();
        let sample = ["2020-01-01", "2020-02-01", "2020-03-01"];
        assert_eq!(classifier.classify_values(&sample), ColumnKind::Datetime);
    }

    #[test]
    fn test_short_values_are_not_dates() {
        let classifier = ColumnClassifier::new();
        assert_eq!(classifier.classify_values(&["1999", "2000", "2001"]), ColumnKind::Numeric);
    }

    #[test]
    fn test_numeric_threshold() {
        let classifier = ColumnClassifier::new();

        let mut sample: Vec<String> = (0..70).map(|i| format!("${i}.50")).collect();
        sample.extend((0..30).map(|i| format!("n/a {}", ["x", "y", "z"][i % 3])));
        let refs: Vec<&str> = sample.iter().map(String::as_str).collect();
        assert_eq!(classifier.classify_values(&refs), ColumnKind::Numeric);

        let mut sample: Vec<String> = (0..69).map(|i| i.to_string()).collect();
        sample.extend((0..31).map(|_| "unknown".to_string()));
        let refs: Vec<&str> = sample.iter().map(String::as_str).collect();
        assert_eq!(classifier.classify_values(&refs), ColumnKind::Categorical);
    }

    #[test]
    fn test_only_first_samples_count() {
        // Values past the sample window never influence the result
        let mut rows = String::from("v\n");
        for i in 0..100 {
            rows.push_str(&format!("{i}\n"));
        }
        for _ in 0..500 {
            rows.push_str("text\n");
        }
        let ds = parse_csv(&rows);
        assert_eq!(ColumnClassifier::new().classify("v", &ds), Some(ColumnKind::Numeric));
        assert_eq!(
            ColumnClassifier::new().with_sample_size(1000).classify("v", &ds),
            Some(ColumnKind::Categorical)
        );
    }

    #[test]
    fn test_empty_column_is_skipped() {
        let ds = parse_csv("a,b\n1,\n2,  \n");
        let classifier = ColumnClassifier::new();
        assert_eq!(classifier.classify("b", &ds), None);
        assert_eq!(classifier.classify("missing", &ds), None);
    }
}
