//! Convenience result type alias for QuickChat.

use crate::error::AppError;

/// A specialized `Result` type for QuickChat operations.
pub type AppResult<T> = Result<T, AppError>;
