//! Claim coordination: turns ledger decisions into visitor-facing outcomes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use coupondrop_core::traits::ledger::{AllocationResult, CouponLedger, LedgerSnapshot};
use coupondrop_core::types::{Coupon, NetworkId, RestrictionScope, SessionKey};

/// Outcome of a claim attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimOutcome {
    /// A coupon was handed out.
    Allocated {
        /// The coupon.
        coupon: Coupon,
        /// Confirmation shown to the visitor.
        message: String,
    },
    /// An active restriction blocked the claim.
    Denied {
        /// Identity whose restriction clears last.
        scope: RestrictionScope,
        /// Whole minutes until the pair may claim again.
        minutes_remaining: u64,
        /// Explanation shown to the visitor.
        message: String,
    },
}

impl ClaimOutcome {
    /// The visitor-facing message for either variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Allocated { message, .. } | Self::Denied { message, .. } => message,
        }
    }
}

/// Whether a pair may claim right now, and how long each restriction has left.
///
/// A wait of `0` means "not restricted", never "restricted for zero minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOutcome {
    /// `true` iff both waits are `0`.
    pub can_claim: bool,
    /// Minutes left on the network restriction.
    pub network_wait_minutes: u64,
    /// Minutes left on the session restriction.
    pub session_wait_minutes: u64,
}

/// Per-request decision logic sitting in front of a [`CouponLedger`].
#[derive(Debug, Clone)]
pub struct ClaimCoordinator {
    ledger: Arc<dyn CouponLedger>,
}

impl ClaimCoordinator {
    /// Creates a coordinator over the given ledger.
    pub fn new(ledger: Arc<dyn CouponLedger>) -> Self {
        Self { ledger }
    }

    /// The ledger this coordinator delegates to.
    pub fn ledger(&self) -> &Arc<dyn CouponLedger> {
        &self.ledger
    }

    /// Attempt to claim the next coupon for a network/session pair.
    pub async fn claim(
        &self,
        network: &NetworkId,
        session: &SessionKey,
        now: DateTime<Utc>,
    ) -> ClaimOutcome {
        match self.ledger.try_allocate(network, session, now).await {
            AllocationResult::Granted(allocation) => {
                info!(
                    code = %allocation.coupon.code,
                    index = allocation.index,
                    network = %network,
                    session = %session.redacted(),
                    "Coupon claimed"
                );
                let message = format!(
                    "You've claimed: {} ({})",
                    allocation.coupon.code, allocation.coupon.discount
                );
                ClaimOutcome::Allocated {
                    coupon: allocation.coupon,
                    message,
                }
            }
            AllocationResult::Denied(denial) => {
                debug!(
                    network = %network,
                    session = %session.redacted(),
                    scope = %denial.scope,
                    minutes_remaining = denial.minutes_remaining,
                    "Claim denied"
                );
                ClaimOutcome::Denied {
                    scope: denial.scope,
                    minutes_remaining: denial.minutes_remaining,
                    message: format!(
                        "Please wait {} minutes before claiming another coupon from {}.",
                        denial.minutes_remaining,
                        denial.scope.describe()
                    ),
                }
            }
        }
    }

    /// Report whether the pair may claim, without changing any state.
    pub async fn status(
        &self,
        network: &NetworkId,
        session: &SessionKey,
        now: DateTime<Utc>,
    ) -> StatusOutcome {
        let status = self.ledger.restriction_status(network, session, now).await;
        StatusOutcome {
            can_claim: status.is_clear(),
            network_wait_minutes: status.network_wait_minutes,
            session_wait_minutes: status.session_wait_minutes,
        }
    }

    /// Current ledger counters.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot().await
    }
}
