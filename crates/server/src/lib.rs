//! REST façade over the register-search pipeline.
//!
//! Exposes the portal search behind token authentication, a per-service
//! rate ceiling, and a hard wall-clock timeout, plus the unauthenticated
//! state-lookup and informational endpoints.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod limit;
pub mod router;
pub mod state;

pub use auth::JwtConfig;
pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, SharedState};
