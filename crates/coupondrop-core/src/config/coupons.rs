//! Coupon pool and restriction window configuration.

use serde::{Deserialize, Serialize};

use crate::types::coupon::Coupon;

/// Coupon distribution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponConfig {
    /// Ordered coupon pool. Handed out round-robin, never mutated at runtime.
    #[serde(default = "default_pool")]
    pub pool: Vec<Coupon>,
    /// Minutes a network identity must wait between claims.
    #[serde(default = "default_network_window")]
    pub network_window_minutes: u64,
    /// Minutes a browser session must wait between claims.
    #[serde(default = "default_session_window")]
    pub session_window_minutes: u64,
    /// Interval of the expired-restriction sweeper in minutes (`0` disables it).
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_minutes: u64,
}

impl Default for CouponConfig {
    fn default() -> Self {
        Self {
            pool: default_pool(),
            network_window_minutes: default_network_window(),
            session_window_minutes: default_session_window(),
            sweep_interval_minutes: default_sweep_interval(),
        }
    }
}

fn default_pool() -> Vec<Coupon> {
    [
        ("SAVE10NOW", "10%"),
        ("FREESHIP22", "Free Shipping"),
        ("BUY1GET50", "50% off second item"),
        ("WELCOME25", "25% off"),
        ("FLASH15OFF", "15% off"),
    ]
    .into_iter()
    .map(|(code, discount)| Coupon::new(code, discount))
    .collect()
}

fn default_network_window() -> u64 {
    60
}

fn default_session_window() -> u64 {
    120
}

fn default_sweep_interval() -> u64 {
    30
}
