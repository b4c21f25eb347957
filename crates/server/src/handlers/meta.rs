//! Informational endpoints — no auth, no side effects.

use axum::{Extension, Json};
use serde_json::{Value, json};

use hreg_states::StateCode;

use crate::state::SharedState;

/// GET /api/health
pub async fn health(Extension(state): Extension<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "handelsregister-api",
        "config": {
            "rate_limit": state.config.server.rate_limit.to_string(),
            "request_timeout": state.config.server.request_timeout_secs,
        },
    }))
}

/// GET /api/docs
pub async fn docs(Extension(state): Extension<SharedState>) -> Json<Value> {
    let state_codes: Vec<&str> = StateCode::ALL.iter().map(|c| c.as_str()).collect();
    let rate_limit = state.config.server.rate_limit.to_string();
    let timeout_secs = state.config.server.request_timeout_secs;

    Json(json!({
        "authentication": {
            "type": "JWT",
            "header": "Authorization: Bearer <token>",
            "description": "Service-to-service authentication without expiration",
        },
        "rate_limiting": {
            "default": rate_limit,
            "description": "Rate limit applied per authenticated service",
        },
        "request_timeout": {
            "value": format!("{timeout_secs} seconds"),
            "description": "Maximum time allowed for request processing",
        },
        "endpoints": {
            "/api/token": {
                "method": "POST",
                "authentication": false,
                "description": "Generate a service token",
                "body": {
                    "service_name": {
                        "type": "string",
                        "required": true,
                        "description": "Name of the service requesting the token",
                    },
                },
            },
            "/api/search": {
                "method": "GET",
                "authentication": true,
                "rate_limited": true,
                "description": "Search for companies by keywords",
                "parameters": {
                    "keywords": {
                        "type": "string",
                        "required": true,
                        "description": "Search keywords",
                    },
                    "mode": {
                        "type": "string",
                        "required": false,
                        "default": "all",
                        "options": ["all", "min", "exact"],
                        "description": "all=contain all keywords; min=contain at least one keyword; exact=exact company name",
                    },
                    "bundesland": {
                        "type": "string",
                        "required": false,
                        "description": "Filter by German state(s): comma-separated codes or names",
                        "options": state_codes,
                        "example": "BW,BY or just BW",
                    },
                    "force": {
                        "type": "boolean",
                        "required": false,
                        "default": false,
                        "description": "Force a fresh pull and skip the cache",
                    },
                    "debug": {
                        "type": "boolean",
                        "required": false,
                        "default": false,
                        "description": "Verbose portal-protocol logging",
                    },
                },
            },
            "/api/bundesland": {
                "method": "GET",
                "authentication": false,
                "description": "Resolve a state name (German or English) to its code",
                "parameters": {
                    "name": {
                        "type": "string",
                        "required": true,
                        "examples": ["Berlin", "Bayern", "Bavaria", "North Rhine-Westphalia"],
                    },
                },
            },
            "/api/bundesland/list": {
                "method": "GET",
                "authentication": false,
                "description": "List all states with codes and form fields",
            },
            "/api/health": {
                "method": "GET",
                "authentication": false,
                "description": "Health check with effective configuration",
            },
            "/api/docs": {
                "method": "GET",
                "authentication": false,
                "description": "This document",
            },
        },
        "environment_variables": {
            "JWT_SECRET_KEY": "Secret key for token signing (the built-in default is insecure)",
            "RATE_LIMIT_DEFAULT": format!("Rate limit spec string (default: {rate_limit})"),
            "REQUEST_TIMEOUT": format!("Request timeout in seconds (default: {timeout_secs})"),
        },
    }))
}
