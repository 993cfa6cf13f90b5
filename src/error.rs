//! Structured error types for API responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (422)
    MissingRequiredField,
    InvalidFieldValue,
    InvalidRequestBody,

    // Not found errors (404)
    TaskNotFound,

    // Internal errors (500)
    DatabaseError,
}

/// Structured error returned to API clients as a JSON body.
#[derive(Debug, Serialize, Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequestBody, reason)
    }

    pub fn task_not_found(task_id: i64) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    /// The HTTP status this error is served with.
    pub fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFieldValue
            | ErrorCode::InvalidRequestBody => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::TaskNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to ApiError first
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => ApiError::database(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
