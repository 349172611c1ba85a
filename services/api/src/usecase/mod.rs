pub mod booking;
pub mod service;
pub mod user;

use cardoctor_core::error::AppError;
use cardoctor_domain::id::DocumentId;

/// Parse a path segment into a document id.
pub fn parse_id(raw: &str) -> Result<DocumentId, AppError> {
    raw.parse().map_err(|_| AppError::InvalidId)
}
