//! # coupondrop-ledger
//!
//! Allocation state and claim decisions for CouponDrop.
//!
//! ## Modules
//!
//! - `restriction` — per-identity restriction tables and wait computation
//! - `memory` — mutex-guarded in-process ledger (rotation cursor + both tables)
//! - `coordinator` — turns ledger results into visitor-facing outcomes
//! - `sweeper` — background eviction of restrictions whose window has elapsed

pub mod coordinator;
pub mod memory;
pub mod restriction;
pub mod sweeper;

pub use coordinator::{ClaimCoordinator, ClaimOutcome, StatusOutcome};
pub use memory::MemoryLedger;
pub use restriction::RestrictionWindows;
pub use sweeper::RestrictionSweeper;
