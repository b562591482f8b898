//! Query pipeline over a dataset: filter → sort → paginate.
//!
//! Each stage is a plain function that can be called on its own; the
//! [`QueryEngine`] composes them in that order and tells subscribers about
//! every new view.

use serde::{Serialize, Deserialize};

mod engine;
mod filter;
mod pagination;
mod sort;
mod subscriber;

pub use engine::{QueryEngine, ViewSnapshot};
pub use filter::{filter, FilterState};
pub use pagination::{total_pages, Pagination};
pub use sort::{compare_values, sort_records};
pub use subscriber::ViewSubscriber;

/// Direction of a column sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A column sort request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}
