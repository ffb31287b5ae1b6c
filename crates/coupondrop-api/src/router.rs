//! Route definitions for the CouponDrop HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the `/api` router with per-route middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(coupon_routes())
        .merge(health_routes());

    let api_routes = if state.config.rate_limit.enabled {
        api_routes.route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
    } else {
        api_routes
    };

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Claim and status endpoints
fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/coupon", get(handlers::coupon::claim_coupon))
        .route("/status", get(handlers::coupon::claim_status))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ledger", get(handlers::health::ledger_health))
}
