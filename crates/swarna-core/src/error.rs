//! # Validation Errors
//!
//! The only error this crate raises: a draft or rate that cannot be stored
//! as given. Reported before anything touches the store.
//!
//! A room double-booking is deliberately absent. It comes back as a warning
//! beside a prepared booking, and the desk decides whether to override.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Unparsable date, bad email, short password.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Check-out at or before check-in, or a `days` value below one.
    #[error("invalid stay duration: check-out {check_out} must be after check-in {check_in}")]
    InvalidStayDuration {
        check_in: NaiveDateTime,
        check_out: NaiveDateTime,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "room".to_string(),
        };
        assert_eq!(err.to_string(), "room is required");

        let noon = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let err = ValidationError::InvalidStayDuration {
            check_in: noon,
            check_out: noon,
        };
        assert!(err.to_string().starts_with("invalid stay duration"));

        let err = ValidationError::OutOfRange {
            field: "rent".to_string(),
            min: 0,
            max: 1_000_000,
        };
        assert_eq!(err.to_string(), "rent must be between 0 and 1000000");
    }
}
