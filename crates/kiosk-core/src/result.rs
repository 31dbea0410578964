//! Convenience result type alias for Kiosk Queue.

use crate::error::AppError;

/// A specialized `Result` type for queue operations.
///
/// Every crate returns `AppResult<T>` at its public boundary instead of
/// spelling out `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
