//! Token bucket rate limiter middleware.
//!
//! Throttles how often a single client IP may hit `/api`. This is separate
//! from the coupon restriction windows: it bounds request volume, not claims.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::{Mutex, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use coupondrop_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::identity::network_id_from;
use crate::state::AppState;

/// Simple in-memory token bucket rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// IP → bucket state.
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(max_tokens: u32, refill_rate: f64) -> Self {
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            max_tokens,
            refill_rate,
        }
    }

    /// Attempts to consume a token for the given key.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    /// Attempts to consume a token for the given key at a given instant.
    pub async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().await;
        let max_tokens = f64::from(self.max_tokens);

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: max_tokens,
            last_refill: now,
        });

        // Refill tokens
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(max_tokens);
        bucket.last_refill = bucket.last_refill.max(now);

        // Try to consume
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets that would be full again at `now`. Returns how many were removed.
    ///
    /// A full bucket behaves exactly like a missing one, so this never
    /// changes the outcome of a later `check`.
    pub async fn prune_idle(&self, now: Instant) -> usize {
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        let max_tokens = f64::from(self.max_tokens);
        let refill_rate = self.refill_rate;

        buckets.retain(|_, bucket| {
            let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
            bucket.tokens + elapsed * refill_rate < max_tokens
        });

        before - buckets.len()
    }

    /// Number of tracked buckets.
    pub async fn bucket_count(&self) -> usize {
        self.buckets.lock().await.len()
    }

    /// Prune idle buckets every `interval` until the cancel signal flips to
    /// `true` or its sender is dropped.
    pub async fn run_pruner(&self, interval: Duration, mut cancel: watch::Receiver<bool>) {
        info!(
            interval_seconds = interval.as_secs(),
            "Rate limit pruner started"
        );

        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Rate limit pruner received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = self.prune_idle(Instant::now()).await;
                    if removed > 0 {
                        let remaining = self.bucket_count().await;
                        debug!(
                            removed,
                            remaining,
                            "Pruned idle rate limit buckets"
                        );
                    }
                }
            }
        }
    }
}

/// Rejects requests once the caller's bucket is empty.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let network = network_id_from(
        request.headers(),
        request.extensions(),
        state.config.server.trust_forwarded_for,
    );

    if !state.rate_limiter.check(network.as_str()).await {
        warn!(network = %network, path = %request.uri().path(), "Rate limit exceeded");
        return Err(AppError::rate_limit(
            "Too many requests from this IP, please try again later",
        )
        .into());
    }

    Ok(next.run(request).await)
}
