//! Validation errors for foundation value objects.

use thiserror::Error;

/// Errors raised when constructing foundation value objects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("user id too long: {actual} characters exceeds maximum of {max}")]
    UserIdTooLong { max: usize, actual: usize },
}
