//! # coupondrop-api
//!
//! HTTP API layer for CouponDrop built on Axum.
//!
//! Provides the claim and status endpoints, health reporting, middleware
//! (session cookie, rate limiting, CORS, logging), the client identity
//! extractor, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
