//! Dataset model shared by the parser, the analyzers and the query pipeline

use std::fmt;
use std::sync::Arc;
use ahash::AHashMap;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

mod record;

pub use record::Record;

/// Identity of one dataset snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Create a fresh, random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ordered, de-duplicated column names captured once from a header row
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<String>,
    index: AHashMap<String, usize>,
}

impl Schema {
    /// Build a schema from header names.
    ///
    /// A repeated name keeps the position of its first occurrence.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();
        for name in names {
            let name = name.into();
            if !schema.index.contains_key(&name) {
                schema.index.insert(name.clone(), schema.columns.len());
                schema.columns.push(name);
            }
        }
        schema
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, if present
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for Schema {}

/// An ordered sequence of records that all share one schema
#[derive(Debug, Clone)]
pub struct Dataset {
    id: DatasetId,
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from records built against `schema`
    pub fn new(schema: Arc<Schema>, records: Vec<Record>) -> Self {
        debug_assert!(
            records.iter().all(|r| r.schema() == schema.as_ref()),
            "every record must share the dataset schema"
        );
        Self {
            id: DatasetId::new(),
            schema,
            records,
        }
    }

    /// The canonical empty dataset: no columns, no records
    pub fn empty() -> Self {
        Self::new(Arc::new(Schema::default()), Vec::new())
    }

    /// Build a dataset from a header and raw rows.
    ///
    /// Rows are zipped positionally against the header; duplicate header
    /// names resolve to the last value in the row.
    pub fn from_rows<H, S, R>(header: H, rows: R) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = Vec<String>>,
    {
        let header: Vec<String> = header.into_iter().map(Into::into).collect();
        let schema = Arc::new(Schema::new(header.iter().cloned()));
        let records = rows
            .into_iter()
            .map(|row| Record::from_header_row(&schema, &header, row))
            .collect();
        Self::new(schema, records)
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every value of a column in record order, missing ones included
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a str> + 'a {
        let position = self.schema.position(column);
        self.records
            .iter()
            .filter_map(move |record| position.and_then(|p| record.value_at(p)))
    }

    /// Non-missing values of a column (empty or whitespace-only values are skipped)
    pub fn present_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.column_values(column).filter(|v| !v.trim().is_empty())
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Dataset {
    /// Content equality; the snapshot id is ignored
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.records == other.records
    }
}
