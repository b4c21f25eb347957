//! Shared request-handling state.

use std::sync::Arc;

use hreg_config::AppConfig;
use hreg_portal::{PortalError, Searcher};

use crate::limit::RateLimiter;

pub struct AppState {
    pub config: AppConfig,
    pub searcher: Arc<Searcher>,
    pub limiter: RateLimiter,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> Result<SharedState, PortalError> {
        let searcher = Arc::new(Searcher::new(config.portal.clone())?);
        let limiter = RateLimiter::new(config.server.rate_limit.window());
        Ok(Arc::new(Self {
            config,
            searcher,
            limiter,
        }))
    }
}
