//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use coupondrop_core::config::AppConfig;
use coupondrop_core::error::AppError;
use coupondrop_core::traits::ledger::CouponLedger;
use coupondrop_ledger::{ClaimCoordinator, MemoryLedger, RestrictionWindows};

use crate::middleware::rate_limit::RateLimiter;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Claim decisions over the coupon ledger
    pub coordinator: Arc<ClaimCoordinator>,
    /// Per-IP request throttle for `/api`
    pub rate_limiter: RateLimiter,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Assemble state around an existing coordinator.
    pub fn new(config: AppConfig, coordinator: ClaimCoordinator) -> Self {
        let rate_limiter = RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.refill_rate(),
        );

        Self {
            config: Arc::new(config),
            coordinator: Arc::new(coordinator),
            rate_limiter,
            started_at: Instant::now(),
        }
    }

    /// Build the in-memory ledger and coordinator described by `config`.
    ///
    /// Fails if the coupon pool is empty or a window is zero.
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let windows = RestrictionWindows::try_from(&config.coupons)?;
        let ledger = MemoryLedger::new(config.coupons.pool.clone(), windows)?;
        let coordinator = ClaimCoordinator::new(Arc::new(ledger));
        Ok(Self::new(config, coordinator))
    }

    /// The ledger behind the coordinator.
    pub fn ledger(&self) -> Arc<dyn CouponLedger> {
        Arc::clone(self.coordinator.ledger())
    }
}
