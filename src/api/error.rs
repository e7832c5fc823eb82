use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;
use crate::db::kv::StoreError;

/// Service-level errors shared by every entity service.
///
/// Each variant maps to exactly one HTTP status: authentication failures
/// (401) are kept distinct from ownership failures (403), which require a
/// valid identity that simply does not own the target record.
#[derive(Debug)]
pub enum ServiceError {
    /// Key-value store operation failed
    Database(StoreError),

    /// Input rejected before any write
    Validation(String),

    /// Missing, malformed or expired bearer token
    Unauthorized(&'static str),

    /// Valid identity, but not the owner of the target record
    Forbidden(&'static str),

    /// A referenced id does not resolve to a record
    NotFound(&'static str),

    /// Request contradicts current state (duplicate application,
    /// disallowed status transition, edit of a finalized application)
    Conflict(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(e) => write!(f, "Database error: {}", e),
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Authentication failed: {}", msg),
            ServiceError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ServiceError::NotFound(what) => write!(f, "{} not found", what),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Database(e)
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Database(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::Unauthorized(msg) => {
                warn!("Authentication failed: {}", msg);
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "Unauthorized".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::Forbidden(msg) => {
                warn!("Ownership check failed: {}", msg);
                HttpResponse::Forbidden().json(ErrorResponse {
                    error: "Forbidden".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(what) => {
                warn!("{} not found", what);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("{} not found", what)}),
                })
            }
            ServiceError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                HttpResponse::Conflict().json(ErrorResponse {
                    error: "Conflict".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
        }
    }
}
