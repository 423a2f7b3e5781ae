use thiserror::Error;

use crate::db::StorageError;

/// Errors surfaced by order lifecycle operations
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Order already completed: {0}")]
    AlreadyCompleted(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;
