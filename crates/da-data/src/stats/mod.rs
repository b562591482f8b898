//! Per-column statistics and the analysis summary

pub mod histogram;

use std::time::Instant;

use ahash::RandomState;
use da_core::{Dataset, DatasetId};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::schema::{parse_numeric, ColumnClassifier, ColumnKind};
pub use histogram::{bin, Bin};

/// Statistics for a numeric column.
///
/// The extrema, mean and sum are `None` when no value in the column
/// actually parsed, even though the sample looked numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub name: String,
    /// Every parsed value in record order
    pub values: Vec<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub sum: Option<f64>,
}

impl NumericSummary {
    fn from_values(name: &str, values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self {
                name: name.to_string(),
                values,
                min: None,
                max: None,
                mean: None,
                sum: None,
            };
        }

        let sum: f64 = values.iter().sum();
        Self {
            name: name.to_string(),
            min: Some(values.iter().copied().fold(f64::INFINITY, f64::min)),
            max: Some(values.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            mean: Some(sum / values.len() as f64),
            sum: Some(sum),
            values,
        }
    }

    /// Histogram over the parsed values
    pub fn histogram(&self, bin_count: usize) -> Vec<Bin> {
        bin(&self.values, bin_count)
    }
}

/// Occurrences of one distinct value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Statistics for a categorical column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub name: String,
    pub unique_count: usize,
    /// Every non-empty value in record order
    pub values: Vec<String>,
    /// Most frequent first; equal counts keep first-seen order
    pub distribution: Vec<CategoryCount>,
}

impl CategoricalSummary {
    fn from_values(name: &str, values: Vec<String>) -> Self {
        let mut counts: IndexMap<&str, usize, RandomState> = IndexMap::default();
        for value in &values {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }

        let mut distribution: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(value, count)| CategoryCount {
                value: value.to_string(),
                count,
            })
            .collect();
        // Stable, so ties stay in first-occurrence order
        distribution.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            name: name.to_string(),
            unique_count: distribution.len(),
            values,
            distribution,
        }
    }

    /// The `n` most frequent values
    pub fn top(&self, n: usize) -> &[CategoryCount] {
        &self.distribution[..n.min(self.distribution.len())]
    }
}

/// Summary of one classified column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
    Datetime { name: String },
}

impl ColumnSummary {
    pub fn name(&self) -> &str {
        match self {
            ColumnSummary::Numeric(s) => &s.name,
            ColumnSummary::Categorical(s) => &s.name,
            ColumnSummary::Datetime { name } => name,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnSummary::Numeric(_) => ColumnKind::Numeric,
            ColumnSummary::Categorical(_) => ColumnKind::Categorical,
            ColumnSummary::Datetime { .. } => ColumnKind::Datetime,
        }
    }
}

/// Compute the summary of one column for an already chosen kind.
///
/// Uses every non-empty value of the column, not just the classifier's sample.
pub fn summarize(column: &str, kind: ColumnKind, dataset: &Dataset) -> ColumnSummary {
    match kind {
        ColumnKind::Numeric => {
            let values: Vec<f64> = dataset.present_values(column).filter_map(parse_numeric).collect();
            if values.is_empty() {
                warn!("Column '{}' looked numeric but no value parsed", column);
            }
            ColumnSummary::Numeric(NumericSummary::from_values(column, values))
        }
        ColumnKind::Categorical => {
            let values = dataset.present_values(column).map(String::from).collect();
            ColumnSummary::Categorical(CategoricalSummary::from_values(column, values))
        }
        ColumnKind::Datetime => ColumnSummary::Datetime {
            name: column.to_string(),
        },
    }
}

/// Read-only analysis of one dataset snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// The dataset this summary was computed from
    pub dataset_id: DatasetId,
    pub total_records: usize,
    /// Every header column, including ones left out of `columns`
    pub headers: Vec<String>,
    /// Summaries in header order; columns without values are absent
    pub columns: Vec<ColumnSummary>,
}

impl AnalysisSummary {
    /// Number of header columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn numeric(&self) -> impl Iterator<Item = &NumericSummary> {
        self.columns.iter().filter_map(|c| match c {
            ColumnSummary::Numeric(s) => Some(s),
            _ => None,
        })
    }

    pub fn categorical(&self) -> impl Iterator<Item = &CategoricalSummary> {
        self.columns.iter().filter_map(|c| match c {
            ColumnSummary::Categorical(s) => Some(s),
            _ => None,
        })
    }

    /// Names of datetime columns
    pub fn datetime(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|c| match c {
            ColumnSummary::Datetime { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(ColumnSummary::kind)
    }

    /// Whether this summary still describes `dataset`
    pub fn is_for(&self, dataset: &Dataset) -> bool {
        self.dataset_id == dataset.id()
    }
}

/// Classify and summarize every column of `dataset`.
///
/// Columns are processed in parallel; each writes only its own slot and the
/// result keeps header order.
pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> AnalysisSummary {
    let start = Instant::now();
    let classifier = ColumnClassifier::from_config(config);

    let slots: Vec<Option<ColumnSummary>> = dataset
        .columns()
        .par_iter()
        .map(|column| {
            classifier
                .classify(column, dataset)
                .map(|kind| summarize(column, kind, dataset))
        })
        .collect();
    let columns: Vec<ColumnSummary> = slots.into_iter().flatten().collect();

    info!(
        "Analyzed {} records: {} of {} columns summarized in {:?}",
        dataset.len(),
        columns.len(),
        dataset.columns().len(),
        start.elapsed()
    );

    AnalysisSummary {
        dataset_id: dataset.id(),
        total_records: dataset.len(),
        headers: dataset.columns().to_vec(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::parse_csv;

    #[test]
    fn test_numeric_summary() {
        let ds = parse_csv("a,b\n1,2\n3,4\n");
        let summary = analyze(&ds, &AnalysisConfig::default());

        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.column_count(), 2);
        let a = summary.numeric().find(|s| s.name == "a").unwrap();
        assert_eq!(a.min, Some(1.0));
        assert_eq!(a.max, Some(3.0));
        assert_eq!(a.mean, Some(2.0));
        assert_eq!(a.sum, Some(4.0));
        assert!(summary.is_for(&ds));
    }

    #[test]
    fn test_numeric_uses_every_value_and_skips_unparsable() {
        let ds = Dataset::from_rows(
            ["price"],
            ["$10", "$20", "$30", "n/a"].iter().map(|v| vec![v.to_string()]),
        );
        let ColumnSummary::Numeric(price) = summarize("price", ColumnKind::Numeric, &ds) else {
            panic!("expected numeric summary");
        };
        assert_eq!(price.values, vec![10.0, 20.0, 30.0]);
        assert_eq!(price.sum, Some(60.0));
    }

    #[test]
    fn test_degenerate_numeric_column() {
        let ds = Dataset::from_rows(["v"], [vec!["abc".to_string()], vec!["def".to_string()]]);
        let ColumnSummary::Numeric(v) = summarize("v", ColumnKind::Numeric, &ds) else {
            panic!("expected numeric summary");
        };
        assert!(v.values.is_empty());
        assert_eq!((v.min, v.max, v.mean, v.sum), (None, None, None, None));
        assert!(v.histogram(10).is_empty());
    }

    #[test]
    fn test_categorical_distribution_order() {
        let ds = parse_csv("city\nOslo\nRome\nLima\nRome\nLima\nrome\n");
        let summary = analyze(&ds, &AnalysisConfig::default());
        let city = summary.categorical().next().unwrap();

        assert_eq!(city.unique_count, 4);
        assert_eq!(city.values.len(), 6);
        let order: Vec<(&str, usize)> = city
            .distribution
            .iter()
            .map(|c| (c.value.as_str(), c.count))
            .collect();
        assert_eq!(order, vec![("Rome", 2), ("Lima", 2), ("Oslo", 1), ("rome", 1)]);
        assert_eq!(city.top(1)[0].value, "Rome");
        assert_eq!(city.top(10).len(), 4);
    }

    #[test]
    fn test_mixed_dataset() {
        let ds = parse_csv(
            "name,joined,score,notes\n\
             Ada,2020-01-01,90,\n\
             Grace,2021-06-15,85,\n\
             Alan,2019-03-10,70,\n",
        );
        let summary = analyze(&ds, &AnalysisConfig::default());

        // `notes` has no values and is left out, header order is kept
        let names: Vec<&str> = summary.columns.iter().map(ColumnSummary::name).collect();
        assert_eq!(names, vec!["name", "joined", "score"]);
        assert_eq!(summary.column_count(), 4);
        assert_eq!(summary.kind("joined"), Some(ColumnKind::Datetime));
        assert_eq!(summary.kind("score"), Some(ColumnKind::Numeric));
        assert_eq!(summary.kind("name"), Some(ColumnKind::Categorical));
        assert_eq!(summary.kind("notes"), None);
        assert_eq!(summary.datetime().collect::<Vec<_>>(), vec!["joined"]);
    }

    #[test]
    fn test_empty_dataset() {
        let summary = analyze(&Dataset::empty(), &AnalysisConfig::default());
        assert_eq!(summary.total_records, 0);
        assert!(summary.columns.is_empty());
    }

    #[test]
    fn test_summary_serializes_with_kind_tag() {
        let ds = parse_csv("a\n1\n2\n");
        let summary = analyze(&ds, &AnalysisConfig::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["columns"][0]["kind"], "numeric");
        assert_eq!(json["columns"][0]["sum"], 3.0);
    }
}
