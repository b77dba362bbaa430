//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement (in characters)
pub const MIN_NAME_LENGTH: u64 = 1;

/// Maximum name length allowed by the `users.name` column
pub const MAX_NAME_LENGTH: u64 = 100;

// =============================================================================
// Dates
// =============================================================================

/// Wire and parse format for dates of birth (`YYYY-MM-DD`)
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Message returned for any date of birth that does not match [`DOB_FORMAT`]
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Expected format: YYYY-MM-DD";

// =============================================================================
// Pagination
// =============================================================================

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u64 = 100;
