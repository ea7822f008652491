// src/handlers/mod.rs

pub mod comments;
pub mod health;
pub mod movies;

use crate::error::AppError;

/// Method fallback for every route: each endpoint accepts exactly one verb.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
