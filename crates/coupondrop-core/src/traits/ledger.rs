//! Coupon ledger trait and the values it hands back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Coupon, NetworkId, RestrictionScope, SessionKey};

/// A coupon handed out by a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// The allocated coupon.
    pub coupon: Coupon,
    /// Position of the coupon in the pool.
    pub index: usize,
}

/// Why an allocation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    /// The restriction that blocks the longest.
    pub scope: RestrictionScope,
    /// Whole minutes until every restriction on the pair has cleared.
    pub minutes_remaining: u64,
}

/// Result of attempting to allocate a coupon.
///
/// A denial is an expected, user-facing outcome, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationResult {
    /// A coupon was allocated and both restrictions were recorded.
    Granted(Allocation),
    /// At least one restriction is active.
    Denied(Denial),
}

/// Remaining wait per identity. `0` means the identity is not restricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionStatus {
    /// Minutes left on the network restriction, `0` if none is active.
    pub network_wait_minutes: u64,
    /// Minutes left on the session restriction, `0` if none is active.
    pub session_wait_minutes: u64,
}

impl RestrictionStatus {
    /// Whether neither restriction is active.
    pub fn is_clear(&self) -> bool {
        self.network_wait_minutes == 0 && self.session_wait_minutes == 0
    }

    /// The most restrictive bound, or `None` when the pair may claim.
    ///
    /// Ties resolve to the network scope.
    pub fn blocking(&self) -> Option<Denial> {
        if self.is_clear() {
            return None;
        }
        let denial = if self.session_wait_minutes > self.network_wait_minutes {
            Denial {
                scope: RestrictionScope::Session,
                minutes_remaining: self.session_wait_minutes,
            }
        } else {
            Denial {
                scope: RestrictionScope::Network,
                minutes_remaining: self.network_wait_minutes,
            }
        };
        Some(denial)
    }
}

/// Point-in-time view of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Number of coupons in the pool.
    pub pool_size: usize,
    /// Index of the next coupon to hand out.
    pub cursor: usize,
    /// Entries held in the network restriction table (active or not).
    pub network_entries: usize,
    /// Entries held in the session restriction table (active or not).
    pub session_entries: usize,
}

/// Owner of the coupon rotation and both restriction tables.
///
/// Implementations must serialize `try_allocate` so that the
/// check, select, record and advance steps happen as one unit.
#[async_trait]
pub trait CouponLedger: Send + Sync + std::fmt::Debug {
    /// Report the remaining wait for each identity without mutating anything.
    async fn restriction_status(
        &self,
        network: &NetworkId,
        session: &SessionKey,
        now: DateTime<Utc>,
    ) -> RestrictionStatus;

    /// Allocate the coupon at the rotation cursor if neither identity is restricted.
    async fn try_allocate(
        &self,
        network: &NetworkId,
        session: &SessionKey,
        now: DateTime<Utc>,
    ) -> AllocationResult;

    /// Return the current ledger counters.
    async fn snapshot(&self) -> LedgerSnapshot;

    /// Drop entries whose window has fully elapsed. Returns how many were removed.
    async fn prune_expired(&self, now: DateTime<Utc>) -> usize;
}
