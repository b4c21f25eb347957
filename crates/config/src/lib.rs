//! Process configuration for the register-search service.
//!
//! Everything is environment-driven: each field has a usable default and an
//! env var that overrides it. Binaries call `AppConfig::from_env()` once at
//! startup (after `dotenvy`) and pass the struct down as data.
//!
//! | Variable             | Default                                   |
//! |----------------------|-------------------------------------------|
//! | `JWT_SECRET_KEY`     | insecure placeholder — see below          |
//! | `RATE_LIMIT_DEFAULT` | `100 per hour`                            |
//! | `REQUEST_TIMEOUT`    | `30` (seconds)                            |
//! | `HREG_BIND_ADDR`     | `127.0.0.1:5000`                          |
//! | `HREG_PORTAL_URL`    | `https://www.handelsregister.de`          |
//! | `HREG_CACHE_DIR`     | `$TMPDIR/handelsregister_cache`           |

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The signing fallback used when `JWT_SECRET_KEY` is not set. Any token
/// minted with it can be forged by anyone who has read this source file —
/// deployments must override it.
pub const INSECURE_DEFAULT_SECRET: &str = "default-secret-key-change-in-production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rate limit spec {value:?}: expected \"<count> per <second|minute|hour|day>\"")]
    InvalidRateLimit { value: String },
    #[error("invalid REQUEST_TIMEOUT {value:?}: expected whole seconds")]
    InvalidTimeout { value: String },
}

// ── Rate limit spec ───────────────────────────────────────────────────────────

/// Replenishment window of a fixed-window rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Second,
    Minute,
    Hour,
    Day,
}

impl Window {
    pub fn duration(self) -> Duration {
        match self {
            Window::Second => Duration::from_secs(1),
            Window::Minute => Duration::from_secs(60),
            Window::Hour => Duration::from_secs(60 * 60),
            Window::Day => Duration::from_secs(60 * 60 * 24),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Window::Second => "second",
            Window::Minute => "minute",
            Window::Hour => "hour",
            Window::Day => "day",
        }
    }
}

/// A limit spec such as `100 per hour`. Accepts the spelled-out form
/// (`"100 per hour"`) and the compact form (`"100/hour"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSpec {
    pub max_requests: u32,
    pub per: Window,
}

impl RateLimitSpec {
    pub fn window(&self) -> Duration {
        self.per.duration()
    }
}

impl fmt::Display for RateLimitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} per {}", self.max_requests, self.per.as_str())
    }
}

impl FromStr for RateLimitSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::InvalidRateLimit {
            value: s.to_string(),
        };
        let (count, unit) = if let Some((count, unit)) = s.split_once('/') {
            (count, unit)
        } else {
            let mut parts = s.split_whitespace();
            let count = parts.next().ok_or_else(err)?;
            if parts.next() != Some("per") {
                return Err(err());
            }
            (count, parts.next().ok_or_else(err)?)
        };
        let max_requests: u32 = count.trim().parse().map_err(|_| err())?;
        if max_requests == 0 {
            return Err(err());
        }
        let per = match unit.trim().to_lowercase().as_str() {
            "second" | "seconds" => Window::Second,
            "minute" | "minutes" => Window::Minute,
            "hour" | "hours" => Window::Hour,
            "day" | "days" => Window::Day,
            _ => return Err(err()),
        };
        Ok(RateLimitSpec { max_requests, per })
    }
}

// ── Config sections ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub rate_limit: RateLimitSpec,
    /// Wall-clock bound on a single search pipeline run, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            jwt_secret: INSECURE_DEFAULT_SECRET.to_string(),
            rate_limit: RateLimitSpec {
                max_requests: 100,
                per: Window::Hour,
            },
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// True when the process is still running on the placeholder secret.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == INSECURE_DEFAULT_SECRET
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Root URL of the register portal.
    pub base_url: String,
    /// Directory holding one raw result document per search-keyword key.
    pub cache_dir: PathBuf,
    /// Per-exchange HTTP timeout against the portal, in seconds.
    pub http_timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.handelsregister.de".to_string(),
            cache_dir: env::temp_dir().join("handelsregister_cache"),
            http_timeout_secs: 10,
        }
    }
}

impl PortalConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub portal: PortalConfig,
}

impl AppConfig {
    /// Defaults overridden by whatever env vars are present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        if let Ok(secret) = env::var("JWT_SECRET_KEY") {
            if !secret.is_empty() {
                config.server.jwt_secret = secret;
            }
        }
        if let Ok(spec) = env::var("RATE_LIMIT_DEFAULT") {
            config.server.rate_limit = spec.parse()?;
        }
        if let Ok(secs) = env::var("REQUEST_TIMEOUT") {
            config.server.request_timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout { value: secs })?;
        }
        if let Ok(addr) = env::var("HREG_BIND_ADDR") {
            config.server.bind_addr = addr;
        }
        if let Ok(url) = env::var("HREG_PORTAL_URL") {
            config.portal.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(dir) = env::var("HREG_CACHE_DIR") {
            config.portal.cache_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}
