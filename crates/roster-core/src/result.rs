//! Result type aliases

use crate::error::ValidationErrors;

/// Result of a payload or contract check
pub type ValidationResult<T> = Result<T, ValidationErrors>;
