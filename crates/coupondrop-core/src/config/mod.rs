//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `COUPONDROP__*` environment variables. Every
//! field carries a default, so the service starts with no files at all.

pub mod app;
pub mod coupons;
pub mod logging;
pub mod session;

use std::path::Path;

use serde::{Deserialize, Serialize};

use self::app::{ServerConfig, StaticFilesConfig};
use self::coupons::CouponConfig;
use self::logging::LoggingConfig;
use self::session::{RateLimitConfig, SessionConfig};

pub use self::app::CorsConfig;

use crate::error::AppError;
use crate::result::AppResult;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Coupon pool and restriction windows.
    #[serde(default)]
    pub coupons: CouponConfig,
    /// Session cookie settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Per-IP request throttling.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Static claim page.
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `{dir}/default.toml`, `{dir}/{env}.toml`
    /// and environment variables prefixed with `COUPONDROP__`.
    ///
    /// Both files are optional. The result is validated before it is returned.
    pub fn load(dir: impl AsRef<Path>, env: &str) -> AppResult<Self> {
        let dir = dir.as_ref();
        let default_path = dir.join("default");
        let env_path = dir.join(env);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_path.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&env_path.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("COUPONDROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the ledger cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.coupons.pool.is_empty() {
            return Err(AppError::configuration("Coupon pool must not be empty"));
        }
        if let Some(pos) = self
            .coupons
            .pool
            .iter()
            .position(|c| c.code.trim().is_empty())
        {
            return Err(AppError::configuration(format!(
                "Coupon at position {pos} has a blank code"
            )));
        }
        if self.coupons.network_window_minutes == 0 || self.coupons.session_window_minutes == 0 {
            return Err(AppError::configuration(
                "Restriction windows must be at least one minute",
            ));
        }
        if self.rate_limit.enabled && self.rate_limit.max_requests == 0 {
            return Err(AppError::configuration(
                "rate_limit.max_requests must be positive when throttling is enabled",
            ));
        }
        Ok(())
    }
}
