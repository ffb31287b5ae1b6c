//! Trait seams between the HTTP layer and the allocation state.

pub mod ledger;

pub use ledger::CouponLedger;
