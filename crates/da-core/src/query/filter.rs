use serde::{Serialize, Deserialize};

use crate::dataset::{Dataset, Record};

/// Current search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-insensitive substring to look for; empty matches everything
    pub search_term: String,

    /// Column to search in; `None` searches all columns
    pub target_column: Option<String>,
}

impl FilterState {
    pub fn new(search_term: impl Into<String>, target_column: Option<String>) -> Self {
        Self {
            search_term: search_term.into(),
            target_column,
        }
    }

    /// Whether any filter parameter is set
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.target_column.is_some()
    }

    /// Back to "match everything"
    pub fn reset(&mut self) {
        self.search_term.clear();
        self.target_column = None;
    }

    /// Check one record against the current parameters
    pub fn matches(&self, record: &Record) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        Self::matches_lowered(&needle, self.target_column.as_deref(), record)
    }

    fn matches_lowered(needle: &str, column: Option<&str>, record: &Record) -> bool {
        let contains = |value: &str| value.to_lowercase().contains(needle);
        match column {
            Some(column) => record.get(column).is_some_and(contains),
            None => record.values().iter().any(|value| contains(value.as_str())),
        }
    }
}

/// Select the records of `dataset` that match `state`, in dataset order.
///
/// Always starts from the full dataset, so successive calls never narrow
/// each other.
pub fn filter<'a>(dataset: &'a Dataset, state: &FilterState) -> Vec<&'a Record> {
    if state.search_term.is_empty() {
        return dataset.records().iter().collect();
    }

    let needle = state.search_term.to_lowercase();
    let column = state.target_column.as_deref();
    dataset
        .records()
        .iter()
        .filter(|record| FilterState::matches_lowered(&needle, column, record))
        .collect()
}
