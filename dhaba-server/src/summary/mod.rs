//! Financial summaries
//!
//! Daily settlement rollups plus read-side weekly/monthly grouping.

pub mod aggregator;

pub use aggregator::{Period, SummaryAggregator, SummaryHistory};

use thiserror::Error;

use crate::db::StorageError;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type SummaryResult<T> = Result<T, SummaryError>;
