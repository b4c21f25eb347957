//! API error taxonomy and its HTTP mapping.
//!
//! Validation and auth failures are produced before any pipeline work;
//! portal failures arrive as [`hreg_portal::PortalError`] and keep their
//! message text so callers can see what the upstream actually said.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use hreg_config::RateLimitSpec;
use hreg_portal::PortalError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request input. The message enumerates the
    /// acceptable values where a closed set exists.
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed, or unverifiable token.
    #[error("{0}")]
    Unauthorized(String),

    /// Lookup input that resolves to nothing (unknown state name).
    #[error("{message}")]
    NotFound { message: String, hint: String },

    /// Caller exceeded its request ceiling for the current window.
    #[error("Rate limit exceeded")]
    RateLimited { limit: RateLimitSpec },

    /// The pipeline ran past the configured wall-clock bound.
    #[error("Request exceeded timeout of {0} seconds")]
    Timeout(u64),

    /// The portal exchange failed; message text preserved for diagnostics.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        match err {
            PortalError::Cache(io) => ApiError::Internal(format!("result cache failure: {io}")),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::Unauthorized(reason) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": reason }))
            }
            ApiError::NotFound { message, hint } => (
                StatusCode::NOT_FOUND,
                json!({ "error": message, "hint": hint }),
            ),
            ApiError::RateLimited { limit } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Rate limit exceeded", "message": limit.to_string() }),
            ),
            ApiError::Timeout(_) => {
                (StatusCode::GATEWAY_TIMEOUT, json!({ "error": self.to_string() }))
            }
            ApiError::Upstream(message) => {
                warn!(%message, "upstream portal failure");
                (StatusCode::BAD_GATEWAY, json!({ "error": message }))
            }
            ApiError::Internal(message) => {
                error!(%message, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };
        (status, Json(body)).into_response()
    }
}
