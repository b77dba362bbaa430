//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::age::{calculate_age, format_dob};
use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::error::{DomainError, DomainResult};

/// User domain entity as persisted by the store.
///
/// `id`, `created_at` and `updated_at` are assigned by the store; only `name`
/// and `dob` are ever changed by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Age in whole years as of `today`.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        calculate_age(self.dob, today)
    }

    /// Pair the user with its age as of `today`.
    pub fn with_age(self, today: NaiveDate) -> UserWithAge {
        let age = self.age_on(today);
        UserWithAge { user: self, age }
    }
}

/// Check the name bounds, counted in characters.
pub fn validate_name(name: &str) -> DomainResult<()> {
    let len = name.chars().count() as u64;
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&len) {
        return Err(DomainError::validation(format!(
            "Name must be between {} and {} characters",
            MIN_NAME_LENGTH, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// A user together with its derived age.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithAge {
    pub user: User,
    pub age: i32,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Store-assigned user identifier
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i32,
    /// User display name
    #[cfg_attr(feature = "openapi", schema(example = "Alice"))]
    pub name: String,
    /// Date of birth (`YYYY-MM-DD`)
    #[cfg_attr(feature = "openapi", schema(example = "1990-05-10"))]
    pub dob: String,
    /// Age in whole years, derived at read time
    #[cfg_attr(feature = "openapi", schema(example = 35))]
    pub age: i32,
}

impl From<UserWithAge> for UserResponse {
    fn from(record: UserWithAge) -> Self {
        Self {
            id: record.user.id,
            dob: format_dob(record.user.dob),
            name: record.user.name,
            age: record.age,
        }
    }
}
