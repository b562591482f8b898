//! Text encodings of records and analysis reports

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use da_core::Record;
use serde::Serialize;
use tracing::debug;

use crate::stats::{AnalysisSummary, CategoryCount};
use crate::{DataError, Result};

/// Values listed per categorical column in a report
pub const REPORT_TOP_VALUES: usize = 5;

/// Encode records as CSV: a header row, then one line per record with
/// every field quoted.
pub fn to_csv(records: &[Record]) -> Result<String> {
    let first = records.first().ok_or(DataError::EmptyDataset)?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(first.schema().columns())?;
    for record in records {
        writer.write_record(record.values())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Csv(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| DataError::Csv(e.to_string()))?;

    debug!("Encoded {} records as CSV ({} bytes)", records.len(), text.len());
    Ok(text)
}

/// Encode records as a pretty-printed JSON array of objects
pub fn to_json(records: &[Record]) -> Result<String> {
    if records.is_empty() {
        return Err(DataError::EmptyDataset);
    }
    Ok(serde_json::to_string_pretty(records)?)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub generated: DateTime<Utc>,
    pub total_records: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericReport {
    pub column: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub average: Option<f64>,
    pub sum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalReport {
    pub column: String,
    pub unique_values: usize,
    pub top_values: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub numerical: Vec<NumericReport>,
    pub categorical: Vec<CategoricalReport>,
    pub datetime: Vec<String>,
}

/// Analytics report: metadata, column summaries and the records themselves
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub data: Vec<Record>,
}

impl Report {
    /// Build a report for `records` using a summary of their dataset
    pub fn generate(records: &[Record], summary: &AnalysisSummary) -> Result<Self> {
        if records.is_empty() {
            return Err(DataError::EmptyDataset);
        }

        let numerical = summary
            .numeric()
            .map(|s| NumericReport {
                column: s.name.clone(),
                min: s.min,
                max: s.max,
                average: s.mean,
                sum: s.sum,
            })
            .collect();
        let categorical = summary
            .categorical()
            .map(|s| CategoricalReport {
                column: s.name.clone(),
                unique_values: s.unique_count,
                top_values: s.top(REPORT_TOP_VALUES).to_vec(),
            })
            .collect();

        Ok(Self {
            metadata: ReportMetadata {
                generated: Utc::now(),
                total_records: records.len(),
                columns: summary.headers.clone(),
            },
            summary: ReportSummary {
                numerical,
                categorical,
                datetime: summary.datetime().map(String::from).collect(),
            },
            data: records.to_vec(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
