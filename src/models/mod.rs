// src/models/mod.rs

pub mod comment;
pub mod movie;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Parses a 24-character hex identifier, failing with a client error.
pub fn parse_object_id(raw: &str, message: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest(message.to_string()))
}

/// Response for update and delete.
///
/// `success` is true whenever the store accepted the request. `matched`
/// tells whether a record was actually touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MutationResult {
    pub success: bool,
    pub matched: bool,
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
