//! Per-caller fixed-window rate limiting.
//!
//! Counts requests per caller identity inside a fixed replenishment window.
//! The caller table is an LRU map so an open set of service names cannot
//! grow it without bound; evicting a dormant caller merely hands it a fresh
//! window on return.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use lru::LruCache;
use tracing::warn;

use crate::auth::ServiceClaims;
use crate::error::ApiError;
use crate::state::SharedState;

/// Upper bound on distinct callers tracked at once.
const MAX_TRACKED_CALLERS: usize = 1024;

struct CallerWindow {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    window: Duration,
    callers: Mutex<LruCache<String, CallerWindow>>,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            callers: Mutex::new(LruCache::new(
                NonZeroUsize::new(MAX_TRACKED_CALLERS).expect("nonzero cap"),
            )),
        }
    }

    /// Counts one request for `key`; `false` means the ceiling is already
    /// spent for the current window.
    pub fn allow(&self, key: &str, max_requests: u32) -> bool {
        let now = Instant::now();
        let mut callers = self.callers.lock().expect("rate limiter mutex poisoned");
        let caller = callers.get_or_insert_mut(key.to_string(), || CallerWindow {
            started: now,
            count: 0,
        });
        if now.duration_since(caller.started) >= self.window {
            caller.started = now;
            caller.count = 0;
        }
        if caller.count < max_requests {
            caller.count += 1;
            true
        } else {
            false
        }
    }
}

/// Middleware: enforce the request ceiling for the authenticated service.
/// Runs after `jwt_auth`, so an absent claim means a wiring bug, not an
/// anonymous caller.
pub async fn rate_limit(
    axum::Extension(state): axum::Extension<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let service = request
        .extensions()
        .get::<ServiceClaims>()
        .map(|claims| claims.service.clone())
        .ok_or_else(|| ApiError::Internal("rate limiter ran without auth context".to_string()))?;

    let limit = state.config.server.rate_limit;
    if !state.limiter.allow(&service, limit.max_requests) {
        warn!(%service, %limit, "rate limit exceeded");
        return Err(ApiError::RateLimited { limit });
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_applies_within_a_window() {
        let limiter = RateLimiter::new(Duration::from_secs(3600));
        assert!(limiter.allow("svc", 2));
        assert!(limiter.allow("svc", 2));
        assert!(!limiter.allow("svc", 2));
        assert!(!limiter.allow("svc", 2));
    }

    #[test]
    fn callers_are_counted_independently() {
        let limiter = RateLimiter::new(Duration::from_secs(3600));
        assert!(limiter.allow("a", 1));
        assert!(!limiter.allow("a", 1));
        assert!(limiter.allow("b", 1));
    }

    #[test]
    fn window_expiry_replenishes() {
        let limiter = RateLimiter::new(Duration::from_millis(10));
        assert!(limiter.allow("svc", 1));
        assert!(!limiter.allow("svc", 1));
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.allow("svc", 1));
    }

    #[test]
    fn eviction_does_not_leak_counts() {
        let limiter = RateLimiter::new(Duration::from_secs(3600));
        // Flood the table past its cap with distinct callers; the first
        // caller is evicted and returns with a fresh window.
        assert!(limiter.allow("first", 1));
        for i in 0..MAX_TRACKED_CALLERS {
            assert!(limiter.allow(&format!("caller-{i}"), 1));
        }
        assert!(limiter.allow("first", 1));
    }
}
