//! Age derivation and date-of-birth parsing.
//!
//! Age is never stored. It is recomputed from the date of birth against a
//! reference date every time a user is read.

use chrono::{Datelike, NaiveDate};

use crate::constants::DOB_FORMAT;
use crate::error::{DomainError, DomainResult};

/// Whole years between `dob` and `today`.
///
/// One year is subtracted when `(month, day)` of `today` sorts before that of
/// `dob`, i.e. the birthday has not been reached yet this year. A `dob` after
/// `today` yields a negative number; rejecting such input is up to the caller.
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years - 1
    } else {
        years
    }
}

/// Parse a `YYYY-MM-DD` date of birth.
///
/// Parsing is strict: the input must be exactly the canonical rendering of
/// the date it denotes, so `2020-1-5` or `+2020-01-05` are rejected.
pub fn parse_dob(input: &str) -> DomainResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(input, DOB_FORMAT).map_err(|_| DomainError::InvalidDate)?;
    if format_dob(date) != input {
        return Err(DomainError::InvalidDate);
    }
    Ok(date)
}

/// Render a date of birth in the wire format.
pub fn format_dob(date: NaiveDate) -> String {
    date.format(DOB_FORMAT).to_string()
}
