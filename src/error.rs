// src/error.rs

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Every failure a handler can produce maps onto one of these kinds, and
/// each kind has exactly one client-safe message.
#[derive(Debug)]
pub enum AppError {
    // 405 Method Not Allowed
    MethodNotAllowed,

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 500, the document store failed or is unreachable
    Database(String),

    // 500, required configuration is missing or malformed
    Config(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl AppError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Config(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message that is safe to show to any client.
    pub fn safe_message(&self) -> String {
        match self {
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Database(_) => "Database operation failed".to_string(),
            AppError::Config(_) => "Database not configured".to_string(),
            AppError::InternalServerError(_) => "Internal Server Error".to_string(),
        }
    }

    /// Internal detail for infrastructure errors, never part of the safe message.
    fn detail(&self) -> Option<&str> {
        match self {
            AppError::Database(d) | AppError::Config(d) | AppError::InternalServerError(d) => {
                Some(d)
            }
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.detail() {
            Some(detail) => write!(f, "{}: {}", self.safe_message(), detail),
            None => write!(f, "{}", self.safe_message()),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Infrastructure details are logged, and only echoed back in debug builds.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "error": self.safe_message(),
        });

        if let Some(detail) = self.detail() {
            tracing::error!("{:?}: {}", self, detail);
            if cfg!(debug_assertions) {
                body["detail"] = json!(detail);
            }
        }

        (status, Json(body)).into_response()
    }
}

/// Converts driver failures into `AppError::Database`.
/// Allows using `?` operator on collection calls.
impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Surface the first message the model declared, e.g. "Title is required".
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::BadRequest(message)
    }
}
