//! Router construction.

use axum::{
    Extension, Router,
    middleware as axum_mw,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{JwtConfig, jwt_auth};
use crate::handlers;
use crate::limit::rate_limit;
use crate::state::SharedState;

/// Build the full axum router with all routes and middleware.
///
/// Layer order on the protected routes matters: token verification runs
/// first, then the rate limiter (keyed on the verified service claim),
/// then the handler.
pub fn build_router(state: SharedState, jwt_config: JwtConfig) -> Router {
    let protected = Router::new()
        .route("/api/search", get(handlers::search::search))
        .layer(axum_mw::from_fn(rate_limit))
        .layer(axum_mw::from_fn(jwt_auth));

    let public = Router::new()
        .route("/api/token", post(handlers::token::issue_token))
        .route("/api/bundesland", get(handlers::states::lookup))
        .route("/api/bundesland/list", get(handlers::states::list))
        .route("/api/health", get(handlers::meta::health))
        .route("/api/docs", get(handlers::meta::docs));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
        .layer(Extension(jwt_config))
}
