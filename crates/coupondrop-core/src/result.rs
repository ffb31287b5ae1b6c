//! Convenience result type alias for CouponDrop.

use crate::error::AppError;

/// A specialized `Result` type for CouponDrop operations.
pub type AppResult<T> = Result<T, AppError>;
