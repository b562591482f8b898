//! Initial query view settings

use da_core::{FilterState, Pagination, SortDirection, SortSpec};
use serde::{Deserialize, Serialize};

use crate::DataError;

/// Starting filter, sort and page for a query view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub items_per_page: usize,

    /// Case-insensitive search term
    pub search: Option<String>,

    /// Restrict the search to this column
    pub column: Option<String>,

    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,

    /// 1-based page to open
    pub page: Option<usize>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            items_per_page: Pagination::DEFAULT_ITEMS_PER_PAGE,
            search: None,
            column: None,
            sort_column: None,
            sort_direction: SortDirection::Ascending,
            page: None,
        }
    }
}

impl ViewConfig {
    pub fn validate(&self) -> Result<(), DataError> {
        if self.items_per_page == 0 {
            return Err(DataError::InvalidConfig("items_per_page must be positive".into()));
        }
        if self.page == Some(0) {
            return Err(DataError::InvalidConfig("pages are numbered from 1".into()));
        }
        Ok(())
    }

    pub fn filter_state(&self) -> FilterState {
        FilterState::new(self.search.clone().unwrap_or_default(), self.column.clone())
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort_column
            .as_ref()
            .map(|column| SortSpec::new(column.clone(), self.sort_direction))
    }
}
