//! Browser session cookie and per-caller throttling configuration.

use serde::{Deserialize, Serialize};

/// Session cookie settings.
///
/// The cookie only carries an opaque identifier; it is the key of the
/// session restriction table, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie name holding the session identifier.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Cookie lifetime in hours.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

/// Token bucket throttling applied to `/api` per client IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether throttling is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Requests allowed per window (bucket capacity).
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window over which a full bucket is refilled, in seconds.
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
}

impl RateLimitConfig {
    /// Tokens restored per second.
    pub fn refill_rate(&self) -> f64 {
        if self.window_seconds == 0 {
            return f64::from(self.max_requests);
        }
        f64::from(self.max_requests) / self.window_seconds as f64
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_seconds: default_window_seconds(),
        }
    }
}

fn default_cookie_name() -> String {
    "sessionId".to_string()
}

fn default_max_age_hours() -> u64 {
    24
}

fn default_true() -> bool {
    true
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_seconds() -> u64 {
    15 * 60
}
