//! Chart data sources derived from a dataset and its analysis

use chrono::NaiveDateTime;
use da_core::Dataset;
use serde::{Deserialize, Serialize};

use crate::schema::{parse_datetime, parse_numeric};
use crate::stats::{AnalysisSummary, CategoricalSummary, CategoryCount};

/// Most charts a dashboard shows at once
pub const MAX_DEFAULT_CHARTS: usize = 4;

/// One point of a time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub time: NaiveDateTime,
    pub value: f64,
}

/// Values of `value_column` over `date_column`, oldest first.
///
/// Rows where the date does not parse or the value has no number are skipped.
pub fn time_series(dataset: &Dataset, date_column: &str, value_column: &str) -> Vec<TimePoint> {
    let mut points: Vec<TimePoint> = dataset
        .records()
        .iter()
        .filter_map(|record| {
            let time = parse_datetime(record.get(date_column)?)?;
            let value = parse_numeric(record.get(value_column)?)?;
            Some(TimePoint { time, value })
        })
        .collect();
    points.sort_by_key(|p| p.time);
    points
}

/// One point of a scatter plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Pairs of values from two columns, in record order
pub fn scatter(dataset: &Dataset, x_column: &str, y_column: &str) -> Vec<ScatterPoint> {
    dataset
        .records()
        .iter()
        .filter_map(|record| {
            Some(ScatterPoint {
                x: parse_numeric(record.get(x_column)?)?,
                y: parse_numeric(record.get(y_column)?)?,
            })
        })
        .collect()
}

/// The `n` most frequent categories of a column
pub fn top_categories(summary: &CategoricalSummary, n: usize) -> Vec<CategoryCount> {
    summary.top(n).to_vec()
}

/// A chart a presentation layer can draw from the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    TimeSeries { date_column: String, value_column: String },
    Correlation { x_column: String, y_column: String },
    CategoryBar { column: String, top: usize },
    Histogram { column: String, bins: usize },
}

impl ChartSpec {
    pub fn title(&self) -> &'static str {
        match self {
            ChartSpec::TimeSeries { .. } => "Time Series Analysis",
            ChartSpec::Correlation { .. } => "Correlation Analysis",
            ChartSpec::CategoryBar { .. } => "Category Distribution",
            ChartSpec::Histogram { .. } => "Value Distribution",
        }
    }
}

/// Pick the charts worth showing for a summary.
///
/// In order: a time series when there is a date and a number, a correlation
/// of the first two numeric columns, a bar chart of the first categorical
/// column, and a histogram of the first numeric column.
pub fn default_charts(summary: &AnalysisSummary, top: usize, bins: usize) -> Vec<ChartSpec> {
    let numeric: Vec<&str> = summary.numeric().map(|s| s.name.as_str()).collect();
    let mut charts = Vec::with_capacity(MAX_DEFAULT_CHARTS);

    if let (Some(date), Some(value)) = (summary.datetime().next(), numeric.first()) {
        charts.push(ChartSpec::TimeSeries {
            date_column: date.to_string(),
            value_column: value.to_string(),
        });
    }
    if let [x, y, ..] = numeric.as_slice() {
        charts.push(ChartSpec::Correlation {
            x_column: x.to_string(),
            y_column: y.to_string(),
        });
    }
    if let Some(category) = summary.categorical().next() {
        charts.push(ChartSpec::CategoryBar {
            column: category.name.clone(),
            top,
        });
    }
    if let Some(first) = numeric.first() {
        charts.push(ChartSpec::Histogram {
            column: first.to_string(),
            bins,
        });
    }

    charts.truncate(MAX_DEFAULT_CHARTS);
    charts
}
