//! Error types for the petition server
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

// == Petition Error Enum ==
/// Unified error type for the petition server.
#[derive(Error, Debug)]
pub enum PetitionError {
    /// Client supplied data is missing or malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A signature already exists for this email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Record store could not be written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for PetitionError {
    fn from(err: std::io::Error) -> Self {
        PetitionError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for PetitionError {
    fn from(err: serde_json::Error) -> Self {
        PetitionError::Storage(err.to_string())
    }
}

impl From<JsonRejection> for PetitionError {
    fn from(rejection: JsonRejection) -> Self {
        PetitionError::InvalidRequest(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for PetitionError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PetitionError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            PetitionError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            PetitionError::Storage(_) | PetitionError::Internal(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the petition server.
pub type Result<T> = std::result::Result<T, PetitionError>;
