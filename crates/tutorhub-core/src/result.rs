//! Convenience result type alias for TutorHub.

use crate::error::AppError;

/// A specialized `Result` type for TutorHub operations.
pub type AppResult<T> = Result<T, AppError>;
