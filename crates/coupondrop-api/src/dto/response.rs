//! Response DTOs.

use serde::{Deserialize, Serialize};

use coupondrop_core::types::{Coupon, RestrictionScope};
use coupondrop_ledger::StatusOutcome;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of a successful claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    /// Always `true`.
    pub success: bool,
    /// The allocated coupon.
    pub coupon: Coupon,
    /// Confirmation text.
    pub message: String,
}

/// Body of a claim blocked by an active restriction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDeniedResponse {
    /// Always `true`.
    pub error: bool,
    /// Explanation naming the blocking scope and wait.
    pub message: String,
    /// Whole minutes until a claim is possible.
    pub minutes_remaining: u64,
    /// Which restriction clears last.
    pub scope: RestrictionScope,
}

/// Body of `GET /api/status`.
///
/// Wait values of `0` mean "not restricted".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Whether a claim would currently be allowed.
    pub can_claim: bool,
    /// Minutes left on the network restriction.
    pub network_wait_minutes: u64,
    /// Minutes left on the session restriction.
    pub session_wait_minutes: u64,
}

impl From<StatusOutcome> for StatusResponse {
    fn from(outcome: StatusOutcome) -> Self {
        Self {
            can_claim: outcome.can_claim,
            network_wait_minutes: outcome.network_wait_minutes,
            session_wait_minutes: outcome.session_wait_minutes,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}
