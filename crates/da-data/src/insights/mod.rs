//! Dataset context for natural-language insight providers

use std::fmt::Write as _;

use da_core::{Dataset, Record};
use serde::Serialize;

use crate::stats::{AnalysisSummary, CategoryCount};

/// Rows of sample data handed to an insight provider
pub const SAMPLE_ROWS: usize = 10;

const TOP_VALUES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericInsight {
    pub name: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalInsight {
    pub name: String,
    pub unique_count: usize,
    pub top_values: Vec<CategoryCount>,
}

/// Compact description of a dataset: column summaries plus a few sample rows
#[derive(Debug, Clone, Serialize)]
pub struct InsightContext {
    pub total_records: usize,
    pub columns: Vec<String>,
    pub numeric: Vec<NumericInsight>,
    pub categorical: Vec<CategoricalInsight>,
    pub datetime: Vec<String>,
    pub sample_rows: Vec<Record>,
}

impl InsightContext {
    pub fn from_summary(summary: &AnalysisSummary, dataset: &Dataset) -> Self {
        Self {
            total_records: summary.total_records,
            columns: summary.headers.clone(),
            numeric: summary
                .numeric()
                .map(|s| NumericInsight {
                    name: s.name.clone(),
                    min: s.min,
                    max: s.max,
                    mean: s.mean,
                })
                .collect(),
            categorical: summary
                .categorical()
                .map(|s| CategoricalInsight {
                    name: s.name.clone(),
                    unique_count: s.unique_count,
                    top_values: s.top(TOP_VALUES).to_vec(),
                })
                .collect(),
            datetime: summary.datetime().map(String::from).collect(),
            sample_rows: dataset.records().iter().take(SAMPLE_ROWS).cloned().collect(),
        }
    }

    /// Plain-text summary lines
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total Records: {}", self.total_records);

        let numeric: Vec<String> = self
            .numeric
            .iter()
            .map(|n| match (n.min, n.max, n.mean) {
                (Some(min), Some(max), Some(mean)) => {
                    format!("{} (min: {}, max: {}, avg: {:.2})", n.name, min, max, mean)
                }
                _ => format!("{} (no values)", n.name),
            })
            .collect();
        let _ = writeln!(out, "Numerical columns: {}", numeric.join(", "));

        let categorical: Vec<String> = self
            .categorical
            .iter()
            .map(|c| format!("{} ({} unique values)", c.name, c.unique_count))
            .collect();
        let _ = writeln!(out, "Categorical columns: {}", categorical.join(", "));
        let _ = writeln!(out, "Date/Time columns: {}", self.datetime.join(", "));
        out
    }
}

/// Questions worth asking about a dataset, most specific first
pub fn query_suggestions(summary: &AnalysisSummary) -> Vec<String> {
    let mut suggestions = Vec::new();

    if let Some(numeric) = summary.numeric().next() {
        suggestions.push(format!("What is the average {}?", numeric.name));
        suggestions.push(format!("Show me the distribution of {}", numeric.name));
    }
    if let Some(categorical) = summary.categorical().next() {
        suggestions.push(format!("What are the most common {} values?", categorical.name));
        suggestions.push(format!("How many unique {} are there?", categorical.name));
    }
    if summary.datetime().next().is_some() {
        suggestions.push("What is the date range of this data?".to_string());
        suggestions.push("Show me trends over time".to_string());
    }

    suggestions.push("Summarize the key insights from this data".to_string());
    suggestions.push("What patterns do you see in this dataset?".to_string());
    suggestions
}
