use std::sync::Arc;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::Schema;

/// One row of a dataset: an ordered column name → string value mapping.
///
/// Records are immutable once built and cheap to clone; the query pipeline
/// selects and reorders them but never edits values. An empty string
/// stands for a missing value.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: Arc<[String]>,
}

impl Record {
    /// Create a record from values already aligned with `schema`.
    ///
    /// Short rows are padded with empty strings, long rows truncated.
    pub fn new(schema: Arc<Schema>, mut values: Vec<String>) -> Self {
        values.resize(schema.len(), String::new());
        Self {
            schema,
            values: values.into(),
        }
    }

    /// Zip a raw row positionally against the header it was read under.
    ///
    /// Every header position writes its slot, so a repeated name takes the
    /// value of its last occurrence even when the row stops short of it.
    pub fn from_header_row(schema: &Arc<Schema>, header: &[String], mut row: Vec<String>) -> Self {
        row.resize(header.len(), String::new());
        let mut values = vec![String::new(); schema.len()];
        for (name, value) in header.iter().zip(row) {
            if let Some(position) = schema.position(name) {
                values[position] = value;
            }
        }
        Self {
            schema: Arc::clone(schema),
            values: values.into(),
        }
    }

    /// Value of a column, `None` if the schema has no such column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.schema.position(column).and_then(|p| self.value_at(p))
    }

    /// Value at a schema position
    pub fn value_at(&self, position: usize) -> Option<&str> {
        self.values.get(position).map(String::as_str)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// True when every value is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|v| v.trim().is_empty())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.values == other.values
    }
}

impl Eq for Record {}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
