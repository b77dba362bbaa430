//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity, age derivation and the date-of-birth wire format.

pub mod age;
pub mod clock;
pub mod constants;
pub mod error;
pub mod user;

pub use age::{calculate_age, format_dob, parse_dob};
pub use clock::{Clock, FixedClock, SystemClock};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use user::{validate_name, User, UserResponse, UserWithAge};
