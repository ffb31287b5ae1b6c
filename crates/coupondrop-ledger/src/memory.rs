//! In-memory coupon ledger using a Tokio mutex for single-process deployments.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use coupondrop_core::error::AppError;
use coupondrop_core::traits::ledger::{
    Allocation, AllocationResult, CouponLedger, LedgerSnapshot, RestrictionStatus,
};
use coupondrop_core::types::{Coupon, NetworkId, SessionKey};

use crate::restriction::{RestrictionEntry, RestrictionTable, RestrictionWindows};

/// Mutable state, only ever touched with the lock held.
#[derive(Debug)]
struct InnerState {
    /// Index of the next coupon to hand out. Always `< pool.len()`.
    cursor: usize,
    /// Last claim per network identity.
    network: RestrictionTable<NetworkId>,
    /// Last claim per browser session.
    session: RestrictionTable<SessionKey>,
}

impl InnerState {
    fn status(
        &self,
        network: &NetworkId,
        session: &SessionKey,
        now: DateTime<Utc>,
    ) -> RestrictionStatus {
        RestrictionStatus {
            network_wait_minutes: self.network.wait_minutes(network, now),
            session_wait_minutes: self.session.wait_minutes(session, now),
        }
    }
}

/// In-memory ledger owning the coupon rotation and both restriction tables.
///
/// Every operation takes the same mutex, so an allocation is observed
/// either entirely or not at all. Suitable for a single process only.
#[derive(Debug, Clone)]
pub struct MemoryLedger {
    /// Coupon pool, fixed at construction.
    pool: Arc<[Coupon]>,
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryLedger {
    /// Creates a ledger over a non-empty pool with the cursor at the first coupon.
    pub fn new(pool: Vec<Coupon>, windows: RestrictionWindows) -> Result<Self, AppError> {
        if pool.is_empty() {
            return Err(AppError::configuration(
                "Cannot start a coupon ledger with an empty pool",
            ));
        }

        info!(
            pool_size = pool.len(),
            network_window_minutes = windows.network.num_minutes(),
            session_window_minutes = windows.session.num_minutes(),
            "Coupon ledger initialized"
        );

        Ok(Self {
            pool: pool.into(),
            state: Arc::new(Mutex::new(InnerState {
                cursor: 0,
                network: RestrictionTable::new(windows.network),
                session: RestrictionTable::new(windows.session),
            })),
        })
    }

    /// The configured coupon pool.
    pub fn pool(&self) -> &[Coupon] {
        &self.pool
    }
}

#[async_trait]
impl CouponLedger for MemoryLedger {
    async fn restriction_status(
        &self,
        network: &NetworkId,
        session: &SessionKey,
        now: DateTime<Utc>,
    ) -> RestrictionStatus {
        let state = self.state.lock().await;
        state.status(network, session, now)
    }

    async fn try_allocate(
        &self,
        network: &NetworkId,
        session: &SessionKey,
        now: DateTime<Utc>,
    ) -> AllocationResult {
        let mut state = self.state.lock().await;

        if let Some(denial) = state.status(network, session, now).blocking() {
            return AllocationResult::Denied(denial);
        }

        let index = state.cursor;
        let entry = RestrictionEntry {
            claimed_at: now,
            coupon_index: index,
        };
        state.network.record(network.clone(), entry);
        state.session.record(session.clone(), entry);
        state.cursor = (index + 1) % self.pool.len();

        debug!(index, next = state.cursor, "Rotation cursor advanced");

        AllocationResult::Granted(Allocation {
            coupon: self.pool[index].clone(),
            index,
        })
    }

    async fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.lock().await;
        LedgerSnapshot {
            pool_size: self.pool.len(),
            cursor: state.cursor,
            network_entries: state.network.len(),
            session_entries: state.session.len(),
        }
    }

    async fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.lock().await;
        let removed = state.network.prune(now) + state.session.prune(now);
        if removed > 0 {
            debug!(
                removed,
                network_entries = state.network.len(),
                session_entries = state.session.len(),
                "Pruned expired restrictions"
            );
        }
        removed
    }
}
