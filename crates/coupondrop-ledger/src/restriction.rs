//! Per-identity restriction tables.
//!
//! An entry records when an identity last claimed and which coupon it got.
//! Whether the entry still restricts is never stored: it is recomputed
//! from the clock on every lookup.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, TimeDelta, Utc};

use coupondrop_core::config::coupons::CouponConfig;
use coupondrop_core::error::AppError;

/// Lengths of the two cooling-off windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionWindows {
    /// Window applied to network identities.
    pub network: TimeDelta,
    /// Window applied to browser sessions.
    pub session: TimeDelta,
}

impl RestrictionWindows {
    /// Build windows from whole minutes. Both must be positive.
    pub fn from_minutes(network: u64, session: u64) -> Result<Self, AppError> {
        Ok(Self {
            network: window_from_minutes("network", network)?,
            session: window_from_minutes("session", session)?,
        })
    }
}

impl Default for RestrictionWindows {
    fn default() -> Self {
        Self {
            network: TimeDelta::minutes(60),
            session: TimeDelta::minutes(120),
        }
    }
}

impl TryFrom<&CouponConfig> for RestrictionWindows {
    type Error = AppError;

    fn try_from(config: &CouponConfig) -> Result<Self, Self::Error> {
        Self::from_minutes(config.network_window_minutes, config.session_window_minutes)
    }
}

fn window_from_minutes(name: &str, minutes: u64) -> Result<TimeDelta, AppError> {
    if minutes == 0 {
        return Err(AppError::configuration(format!(
            "The {name} restriction window must be at least one minute"
        )));
    }
    i64::try_from(minutes)
        .ok()
        .and_then(TimeDelta::try_minutes)
        .ok_or_else(|| {
            AppError::configuration(format!("The {name} restriction window is too large"))
        })
}

/// A recorded claim by one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionEntry {
    /// When the claim happened.
    pub claimed_at: DateTime<Utc>,
    /// Pool position of the coupon that was claimed.
    pub coupon_index: usize,
}

impl RestrictionEntry {
    /// Time left on the restriction, or `None` once `now - claimed_at >= window`.
    ///
    /// A `now` earlier than the claim counts as zero elapsed time.
    pub fn remaining(&self, window: TimeDelta, now: DateTime<Utc>) -> Option<TimeDelta> {
        let elapsed = (now - self.claimed_at).max(TimeDelta::zero());
        (elapsed < window).then(|| window - elapsed)
    }
}

/// Round a positive duration up to whole minutes, never below one.
///
/// Any leftover below a minute, down to a nanosecond, counts as a full minute.
pub fn ceil_minutes(remaining: TimeDelta) -> u64 {
    let whole = remaining.num_minutes();
    let minutes = if remaining > TimeDelta::minutes(whole) {
        whole + 1
    } else {
        whole
    };
    u64::try_from(minutes).unwrap_or(0).max(1)
}

/// Restriction entries keyed by one kind of identity.
#[derive(Debug)]
pub struct RestrictionTable<K> {
    /// Cooling-off window for this table.
    window: TimeDelta,
    /// Last claim per identity. Inactive entries stay until pruned.
    entries: HashMap<K, RestrictionEntry>,
}

impl<K: Eq + Hash> RestrictionTable<K> {
    /// Creates an empty table with the given window.
    pub fn new(window: TimeDelta) -> Self {
        Self {
            window,
            entries: HashMap::new(),
        }
    }

    /// The table's window.
    pub fn window(&self) -> TimeDelta {
        self.window
    }

    /// Whole minutes left for `key`, `0` when it is not restricted.
    pub fn wait_minutes(&self, key: &K, now: DateTime<Utc>) -> u64 {
        self.entries
            .get(key)
            .and_then(|entry| entry.remaining(self.window, now))
            .map(ceil_minutes)
            .unwrap_or(0)
    }

    /// Look up the raw entry for `key`, active or not.
    pub fn get(&self, key: &K) -> Option<&RestrictionEntry> {
        self.entries.get(key)
    }

    /// Record a claim, replacing any previous entry for `key`.
    pub fn record(&mut self, key: K, entry: RestrictionEntry) {
        self.entries.insert(key, entry);
    }

    /// Remove entries whose window has elapsed. Returns the number removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let window = self.window;
        self.entries
            .retain(|_, entry| entry.remaining(window, now).is_some());
        before - self.entries.len()
    }

    /// Number of stored entries, active or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
