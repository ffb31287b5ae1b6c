//! Route handlers organized by domain.

pub mod coupon;
pub mod health;
