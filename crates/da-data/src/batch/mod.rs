//! Arrow conversion for tabular renderers

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use da_core::Record;

use crate::schema::{parse_numeric, ColumnKind};
use crate::stats::AnalysisSummary;
use crate::DataError;

/// Arrow type used for a column of the given kind
pub fn arrow_type(kind: Option<ColumnKind>) -> DataType {
    match kind {
        Some(ColumnKind::Numeric) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

/// Build a record batch with one column per header of `summary`.
///
/// Numeric columns become `Float64` (unparsable values are null), every other
/// column is `Utf8`. Empty values are null in both.
pub fn to_record_batch(records: &[Record], summary: &AnalysisSummary) -> Result<RecordBatch, DataError> {
    let fields: Vec<Field> = summary
        .headers
        .iter()
        .map(|name| Field::new(name, arrow_type(summary.kind(name)), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    if schema.fields().is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let arrays: Vec<ArrayRef> = summary
        .headers
        .iter()
        .map(|name| match summary.kind(name) {
            Some(ColumnKind::Numeric) => numeric_array(records, name),
            _ => string_array(records, name),
        })
        .collect();

    Ok(RecordBatch::try_new(schema, arrays)?)
}

fn present<'a>(record: &'a Record, column: &str) -> Option<&'a str> {
    record.get(column).filter(|v| !v.trim().is_empty())
}

fn numeric_array(records: &[Record], column: &str) -> ArrayRef {
    let mut builder = Float64Builder::with_capacity(records.len());
    for record in records {
        builder.append_option(present(record, column).and_then(parse_numeric));
    }
    Arc::new(builder.finish())
}

fn string_array(records: &[Record], column: &str) -> ArrayRef {
    let mut builder = StringBuilder::new();
    for record in records {
        builder.append_option(present(record, column));
    }
    Arc::new(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::sources::parse_csv;
    use crate::stats::analyze;
    use arrow::array::{Array, Float64Array, StringArray};
    use da_core::Dataset;

    #[test]
    fn test_column_types_follow_classification() {
        let ds = parse_csv("city,price,joined\nOslo,$10,2020-01-01\nRome,,2020-02-01\n");
        let summary = analyze(&ds, &AnalysisConfig::default());
        let batch = to_record_batch(ds.records(), &summary).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Float64);
        assert_eq!(batch.schema().field(2).data_type(), &DataType::Utf8);

        let price = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(price.value(0), 10.0);
        assert!(price.is_null(1));

        let city = batch.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(city.value(1), "Rome");
    }

    #[test]
    fn test_page_subset() {
        let ds = parse_csv("n\n1\n2\n3\n");
        let summary = analyze(&ds, &AnalysisConfig::default());
        let batch = to_record_batch(&ds.records()[1..], &summary).unwrap();
        assert_eq!(batch.num_rows(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        let summary = analyze(&Dataset::empty(), &AnalysisConfig::default());
        let batch = to_record_batch(&[], &summary).unwrap();
        assert_eq!(batch.num_columns(), 0);
        assert_eq!(batch.num_rows(), 0);
    }
}
