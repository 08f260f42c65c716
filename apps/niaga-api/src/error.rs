//! HTTP error mapping.
//!
//! Every failure reaches the dashboard as `{"code": "...", "message": "..."}`
//! with an Indonesian message naming the failed precondition.
//!
//! ```text
//! Validation / IllegalTransition  → 400
//! NotFound                        → 404
//! Conflict                        → 409
//! storage failure                 → 500 (details logged, not returned)
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use niaga_core::error::ErrorCategory;
use niaga_core::{CoreError, ValidationError};
use niaga_db::DbError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Handler errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Response body for every error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn category(&self) -> Option<ErrorCategory> {
        match self {
            ApiError::Db(e) => e.category(),
            ApiError::Core(e) => Some(e.category()),
            ApiError::Validation(_) => Some(ErrorCategory::Validation),
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::Core(e) | ApiError::Db(DbError::Rule(e)) => e.user_message(),
            ApiError::Validation(e) => e.user_message(),
            ApiError::Db(DbError::NotFound { entity, .. }) => {
                format!("{} tidak ditemukan", entity)
            }
            ApiError::Db(DbError::UniqueViolation { field, .. }) => {
                format!("Data dengan {} yang sama sudah ada", field)
            }
            ApiError::Db(DbError::ForeignKeyViolation { .. }) => {
                "Data masih digunakan oleh data lain atau referensinya tidak ada".to_string()
            }
            ApiError::Db(_) => "Terjadi kesalahan pada server, silakan coba lagi".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match self.category() {
            Some(ErrorCategory::Validation) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Some(ErrorCategory::IllegalTransition) => (StatusCode::BAD_REQUEST, "ILLEGAL_TRANSITION"),
            Some(ErrorCategory::NotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Some(ErrorCategory::Conflict) => (StatusCode::CONFLICT, "CONFLICT"),
            None => {
                error!(error = %self, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorBody {
            code,
            message: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}
