//! Error handling for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eprint::EprintError;
use eprint_services::ServicesError;
use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Domain error: {0}")]
    Domain(#[from] EprintError),

    #[error("Backend error: {0}")]
    Services(#[from] ServicesError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Services(ref e) => match e {
                ServicesError::ArticleNotFound(_) | ServicesError::VersionNotFound { .. } => {
                    (StatusCode::NOT_FOUND, self.to_string())
                }
                ServicesError::Domain(
                    EprintError::InvalidIdentifier { .. } | EprintError::InvalidVersion { .. },
                ) => (StatusCode::BAD_REQUEST, self.to_string()),
                _ => (StatusCode::BAD_GATEWAY, "Backend error".to_string()),
            },
            ApiError::Domain(ref e) => match e {
                EprintError::InvalidIdentifier { .. } | EprintError::InvalidVersion { .. } => {
                    (StatusCode::BAD_REQUEST, self.to_string())
                }
                EprintError::StatusLookup { .. } => (
                    StatusCode::BAD_GATEWAY,
                    "Render status lookup failed".to_string(),
                ),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// Convenience functions for common errors
impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }

    pub fn internal(msg: &str) -> Self {
        Self::Internal(msg.to_string())
    }
}
