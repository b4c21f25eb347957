//! hreg-server — REST façade over the register-search pipeline.
//!
//! Configuration comes from the environment (see `hreg-config`):
//!   JWT_SECRET_KEY     — token signing secret (required in production)
//!   RATE_LIMIT_DEFAULT — e.g. "100 per hour"
//!   REQUEST_TIMEOUT    — pipeline wall-clock bound in seconds
//!   HREG_BIND_ADDR     — listen address (default: 127.0.0.1:5000)

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hreg_config::AppConfig;
use hreg_server::{AppState, JwtConfig, build_router};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,hreg_server=debug".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    if config.server.uses_default_secret() {
        warn!(
            "JWT_SECRET_KEY is not set — running with the built-in default secret; \
             tokens are forgeable and this must not reach production"
        );
    }

    let jwt_config = JwtConfig::from_secret(config.server.jwt_secret.as_bytes());
    let bind_addr = config.server.bind_addr.clone();
    info!(
        rate_limit = %config.server.rate_limit,
        request_timeout_secs = config.server.request_timeout_secs,
        portal = %config.portal.base_url,
        "starting hreg-server"
    );

    let state = AppState::new(config)?;
    let app = build_router(state, jwt_config);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("hreg-server listening on {bind_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
