//! HTTP error surface
//!
//! Every handler returns `AppResult<T>`; the error half renders as a JSON
//! body `{ "code": "...", "message": "..." }` with a stable machine code
//! per category, so clients can branch without parsing messages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::db::StorageError;
use crate::orders::manager::ManagerError;
use crate::summary::SummaryError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E0002",
            Self::NotFound(_) => "E0003",
            Self::Conflict(_) => "E0004",
            Self::BusinessRule(_) => "E0005",
            Self::Internal(_) => "E9001",
            Self::Database(_) => "E9002",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BusinessRule(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::NotFound(msg) => Self::NotFound(msg),
            ManagerError::Conflict(msg) => Self::Conflict(msg),
            ManagerError::InvalidTransition(msg) => Self::BusinessRule(msg),
            ManagerError::AlreadyCompleted(msg) => {
                Self::Conflict(format!("order already completed: {}", msg))
            }
            ManagerError::Validation(msg) => Self::Validation(msg),
            ManagerError::Storage(err) => Self::Database(err.to_string()),
        }
    }
}

impl From<SummaryError> for AppError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::NotFound(msg) => Self::NotFound(msg),
            SummaryError::Validation(msg) => Self::Validation(msg),
            SummaryError::Storage(err) => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_per_category() {
        assert_eq!(AppError::validation("x").code(), "E0002");
        assert_eq!(AppError::not_found("x").code(), "E0003");
        assert_eq!(AppError::conflict("x").code(), "E0004");
        assert_eq!(AppError::business_rule("x").code(), "E0005");
        assert_eq!(AppError::internal("x").code(), "E9001");
    }

    #[test]
    fn manager_errors_map_to_http_categories() {
        let err: AppError = ManagerError::AlreadyCompleted("o1".to_string()).into();
        assert_eq!(err.code(), "E0004");
        let err: AppError = ManagerError::InvalidTransition("ready -> preparing".to_string()).into();
        assert_eq!(err.code(), "E0005");
    }
}
