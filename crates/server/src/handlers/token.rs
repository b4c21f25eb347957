//! Service-token issuance.

use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::auth::JwtConfig;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub service_name: Option<String>,
}

/// POST /api/token — mint a non-expiring token for a named service.
/// Issuance itself is unauthenticated; possession of the signing secret is
/// what protects deployments, not this endpoint.
pub async fn issue_token(
    Extension(jwt): Extension<JwtConfig>,
    body: Option<Json<TokenRequest>>,
) -> Result<Json<Value>, ApiError> {
    let service_name = body
        .and_then(|Json(request)| request.service_name)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Missing service_name in request body".to_string()))?;

    let token = jwt.issue(&service_name)?;
    info!(service = %service_name, "issued service token");
    Ok(Json(json!({
        "token": token,
        "service": service_name,
    })))
}
