// Handlers by access tier:
// public (no token) -> protected (bearer token) -> elevated (admin role)
pub mod elevated;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids are parsed here so a malformed id gets the JSON error envelope
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation_error(format!("Resource not found. Invalid: id ({})", raw)))
}
