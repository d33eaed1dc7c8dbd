//! Client-side guards run before any request is issued
//!
//! Validation never raises: a failing check yields a [`ValidationError`]
//! that the caller turns into an error notification, and the submission is
//! dropped without touching the network.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Minimum student age accepted on create and update
pub const MIN_STUDENT_AGE: i32 = 18;

/// Reasons a form submission is blocked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty (holds the field label)
    MissingField(&'static str),
    /// The birth date could not be parsed
    InvalidDate(String),
    /// The student is younger than [`MIN_STUDENT_AGE`]
    UnderAge { age: i32 },
    /// Enrollment submitted without choosing a course
    NoCourseSelected,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(label) => write!(f, "{} is required", label),
            Self::InvalidDate(raw) => write!(f, "Invalid birth date: {}", raw),
            Self::UnderAge { .. } => {
                write!(f, "Student must be at least {} years old", MIN_STUDENT_AGE)
            }
            Self::NoCourseSelected => write!(f, "Select a course"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Age in whole years on `today`
///
/// Year difference, minus one when today's month/day comes before the
/// birthday in the calendar.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Reject students under the minimum age
pub fn check_min_age(birth: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let age = age_on(birth, today);
    if age < MIN_STUDENT_AGE {
        return Err(ValidationError::UnderAge { age });
    }
    Ok(())
}

/// Return the trimmed value or a missing-field error
pub fn required<'a>(label: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(label));
    }
    Ok(value)
}

/// Today's date in the operator's local time zone
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
