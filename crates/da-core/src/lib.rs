//! Core functionality for the data analytics pipeline
//!
//! This crate provides the in-memory dataset model and the query pipeline
//! (filter, sort, paginate) that presentation layers read pages from.

pub mod dataset;
pub mod query;

use thiserror::Error;

// Re-export commonly used types
pub use dataset::{Dataset, DatasetId, Record, Schema};
pub use query::{
    FilterState, Pagination, QueryEngine, SortDirection, SortSpec,
    ViewSnapshot, ViewSubscriber,
};

/// Errors that can occur while driving the query pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Items per page must be greater than zero (got {0})")]
    InvalidPageSize(usize),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),
}
