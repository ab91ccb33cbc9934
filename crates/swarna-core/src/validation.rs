//! # Validation Module
//!
//! Input validation for bookings and the rate catalog.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Booking form (UI)                                            │
//! │  └── Immediate feedback (empty fields, date pickers)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + booking engine                                 │
//! │  ├── Required fields, amount ranges                                    │
//! │  └── Stay duration (check-out strictly after check-in)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL / CHECK (days >= 1)                                      │
//! │  └── PRIMARY KEY on rates.room_no                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::RoomRate;
use crate::MAX_AMOUNT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Fails with `Required` when the trimmed value is empty.
///
/// ```rust
/// use swarna_core::validation::validate_required;
///
/// assert!(validate_required("room", "101").is_ok());
/// assert!(validate_required("name", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a room number for the rate catalog.
///
/// ## Rules
/// - Must not be empty
/// - At most 20 characters
/// - Must not look like an "Unassigned (...)" placeholder
pub fn validate_room_no(room_no: &str) -> ValidationResult<()> {
    validate_required("room_no", room_no)?;

    if room_no.trim().len() > 20 {
        return Err(ValidationError::TooLong {
            field: "room_no".to_string(),
            max: 20,
        });
    }

    if crate::types::is_unassigned_room(room_no.trim()) {
        return Err(ValidationError::InvalidFormat {
            field: "room_no".to_string(),
            reason: "reserved for unrouted OTA bookings".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query for the booking table.
///
/// Empty is allowed (shows everything). Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a money amount entered at the desk (rent, advance, commission).
///
/// ## Rules
/// - Must be between 0 and [`MAX_AMOUNT`]
pub fn validate_amount(field: &str, units: i64) -> ValidationResult<()> {
    if !(0..=MAX_AMOUNT).contains(&units) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Validates a complete rate-catalog row before insert/update.
pub fn validate_room_rate(rate: &RoomRate) -> ValidationResult<()> {
    validate_room_no(&rate.room_no)?;
    validate_required("room_type", &rate.room_type)?;
    validate_amount("rate", rate.rate)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
