//! # coupondrop-core
//!
//! Core crate for CouponDrop. Contains the configuration schemas, domain
//! types, the ledger trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other CouponDrop crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
