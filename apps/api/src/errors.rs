use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::profile::progression::ProgressionError;
use crate::reports::verification::VerificationError;
use crate::salary::SalaryError;
use crate::skills::unlock::UnlockError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Domain error mapping
// ────────────────────────────────────────────────────────────────────────────

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownJob(_) | CatalogError::UnknownCard(_) => {
                AppError::NotFound(err.to_string())
            }
            // Load-time integrity errors never reach a request.
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<SalaryError> for AppError {
    fn from(err: SalaryError) -> Self {
        AppError::UnprocessableEntity(err.to_string())
    }
}

impl From<UnlockError> for AppError {
    fn from(err: UnlockError) -> Self {
        let UnlockError::Ineligible { unmet, .. } = &err;
        AppError::UnprocessableEntity(format!("{err}: {unmet}"))
    }
}

impl From<ProgressionError> for AppError {
    fn from(err: ProgressionError) -> Self {
        AppError::Conflict(err.to_string())
    }
}

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            VerificationError::MissingReason => AppError::Validation(err.to_string()),
            VerificationError::UnknownStatus(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}
