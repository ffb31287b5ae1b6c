//! Shared domain types.

pub mod coupon;
pub mod identity;

pub use coupon::Coupon;
pub use identity::{NetworkId, RestrictionScope, SessionKey};
