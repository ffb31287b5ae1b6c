//! Periodic eviction of restrictions whose window has elapsed.
//!
//! Restriction tables otherwise grow with every distinct visitor. Only
//! inactive entries are dropped, so sweeping never changes a claim or
//! status result.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use coupondrop_core::traits::ledger::CouponLedger;

/// Background task pruning expired restriction entries.
#[derive(Debug)]
pub struct RestrictionSweeper {
    /// Ledger to prune.
    ledger: Arc<dyn CouponLedger>,
    /// Delay between sweeps.
    interval: Duration,
}

impl RestrictionSweeper {
    /// Create a sweeper running every `interval`.
    pub fn new(ledger: Arc<dyn CouponLedger>, interval: Duration) -> Self {
        Self { ledger, interval }
    }

    /// Run one sweep. Returns the number of entries removed.
    pub async fn sweep_once(&self) -> usize {
        self.ledger.prune_expired(Utc::now()).await
    }

    /// Run until the cancel signal flips to `true` or its sender is dropped.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            "Restriction sweeper started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can have expired yet.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Restriction sweeper received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = self.sweep_once().await;
                    let snapshot = self.ledger.snapshot().await;
                    tracing::info!(
                        removed,
                        network_entries = snapshot.network_entries,
                        session_entries = snapshot.session_entries,
                        "Restriction sweep completed"
                    );
                }
            }
        }
    }
}
