//! Endpoint error type.
//!
//! Every failure leaves a handler as `{success: false, error, code}` where
//! `code` is a stable [`ErrorCode`] clients branch on instead of matching
//! message text.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::common::ErrorResponse;
use crate::validation::ValidationErrors;

/// Machine-readable failure kind carried in every error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MalformedInput,
    ValidationError,
    NotFound,
    Duplicate,
    StoreError,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or unparseable request body
    #[error("No se recibieron datos: {0}")]
    MalformedInput(String),
    /// One or more field constraints violated, messages already joined
    #[error("{0}")]
    Validation(String),
    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),
    /// Unique constraint hit, either by the advisory pre-check or by the insert itself
    #[error("{0}")]
    Conflict(String),
    #[error("Error de base de datos: {0}")]
    Store(DbErr),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::MalformedInput(_) => ErrorCode::MalformedInput,
            ApiError::Validation(_) => ErrorCode::ValidationError,
            ApiError::NotFound(_) => ErrorCode::NotFound,
            ApiError::Conflict(_) => ErrorCode::Duplicate,
            ApiError::Store(_) => ErrorCode::StoreError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ApiError::Conflict(format!("Registro duplicado: {}", detail))
            }
            _ => ApiError::Store(err),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(ref e) = self {
            error!(error = %e, "Store failure");
        }

        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}
