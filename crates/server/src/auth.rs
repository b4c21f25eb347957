//! Service-to-service token auth.
//!
//! Tokens are HS256-signed `{service, iat}` claims with no expiry: validity
//! is purely signature-based, nothing is stored server-side, and every
//! request re-verifies independently. The signing key is process-wide
//! configuration loaded once at startup.

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Claims carried by a service token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceClaims {
    /// Name of the calling service; doubles as the rate-limit identity.
    pub service: String,
    /// Unix seconds at issuance. Informational only — never checked.
    pub iat: i64,
}

#[derive(Clone)]
pub struct JwtConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtConfig {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Service tokens carry no exp claim; only the signature counts.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, service: &str) -> Result<String, ApiError> {
        let claims = ServiceClaims {
            service: service.to_string(),
            iat: Utc::now().timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<ServiceClaims, ApiError> {
        decode::<ServiceClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))
    }
}

/// Pulls the token out of the `Authorization` header. Accepts the standard
/// `Bearer <token>` form and, for lenient callers, a bare token value.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication token".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header format".to_string()))?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        Some(_) => Err(ApiError::Unauthorized(
            "Invalid Authorization header format".to_string(),
        )),
        None => Ok(value),
    }
}

/// Middleware: verify the bearer token and stash the claims for downstream
/// layers (the rate limiter keys on the verified service name).
pub async fn jwt_auth(
    axum::Extension(jwt): axum::Extension<JwtConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = {
        let token = bearer_token(request.headers())?;
        jwt.verify(token)?
    };
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn jwt() -> JwtConfig {
        JwtConfig::from_secret(b"test-secret")
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let config = jwt();
        let token = config.issue("billing-service").unwrap();
        let claims = config.verify(&token).unwrap();
        assert_eq!(claims.service, "billing-service");
        assert!(claims.iat > 0);
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let token = jwt().issue("svc").unwrap();
        let other = JwtConfig::from_secret(b"different-secret");
        let err = other.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn garbage_token_fails_with_a_reason() {
        let err = jwt().verify("not.a.token").unwrap_err();
        let ApiError::Unauthorized(reason) = err else {
            panic!("expected Unauthorized");
        };
        assert!(reason.starts_with("Invalid token:"));
    }

    #[test]
    fn tokens_do_not_expire() {
        // A token with an ancient iat (and no exp claim) still verifies.
        let config = jwt();
        let claims = ServiceClaims {
            service: "old-service".into(),
            iat: 0,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert_eq!(config.verify(&token).unwrap().service, "old-service");
    }

    #[test]
    fn bearer_and_bare_headers_both_resolve() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc");

        headers.insert(AUTHORIZATION, HeaderValue::from_static("abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn missing_and_malformed_headers_are_distinguished() {
        let headers = HeaderMap::new();
        let ApiError::Unauthorized(reason) = bearer_token(&headers).unwrap_err() else {
            panic!("expected Unauthorized");
        };
        assert_eq!(reason, "Missing authentication token");

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        let ApiError::Unauthorized(reason) = bearer_token(&headers).unwrap_err() else {
            panic!("expected Unauthorized");
        };
        assert_eq!(reason, "Invalid Authorization header format");
    }
}
