//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

use crate::constants::INVALID_DATE_MESSAGE;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Date of birth is not a `YYYY-MM-DD` calendar date
    #[error("{}", INVALID_DATE_MESSAGE)]
    InvalidDate,

    /// Date of birth lies after the reference date
    #[error("Date of birth cannot be in the future")]
    FutureDateOfBirth,

    /// Validation failed for a field or input
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
