//! The coupon value handed out by the ledger.

use serde::{Deserialize, Serialize};

/// An immutable discount code and its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coupon {
    /// Code the visitor enters at checkout.
    pub code: String,
    /// What the code is worth, e.g. `"Free Shipping"`.
    pub discount: String,
}

impl Coupon {
    /// Create a coupon.
    pub fn new(code: impl Into<String>, discount: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            discount: discount.into(),
        }
    }
}
