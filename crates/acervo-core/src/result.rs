//! Convenience result type alias for Acervo.

use crate::error::AppError;

/// A specialized `Result` type for Acervo operations.
pub type AppResult<T> = Result<T, AppError>;
