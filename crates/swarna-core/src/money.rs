//! # Money Module
//!
//! Provides the `Money` type for tariff and billing amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Room tariffs are quoted in whole rupees.                              │
//! │                                                                         │
//! │  days × rent       = total      (3 × ₹2000 = ₹6000)                    │
//! │  total − advance   = due        (₹6000 − ₹1000 = ₹5000)                │
//! │  price / nights    = rent       (₹5001 / 2 → ₹2501, rounded)           │
//! │                                                                         │
//! │  The only division in the system is the OTA per-night split, and it   │
//! │  rounds explicitly. Everything else is exact integer arithmetic.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use swarna_core::money::Money;
//!
//! let rent = Money::from_units(2000);
//! let total = rent * 3;
//! let due = total - Money::from_units(1000);
//! assert_eq!(due.units(), 5000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// A monetary value in whole currency units.
///
/// Signed, because `due` goes negative when a guest overpays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Splits a stay price evenly across nights, rounding half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use swarna_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(6000).per_night(2).units(), 3000);
    /// assert_eq!(Money::from_units(5001).per_night(2).units(), 2501);
    /// assert_eq!(Money::from_units(1000).per_night(3).units(), 333);
    /// ```
    ///
    /// A non-positive night count is treated as a single night. Prices at
    /// the edge of `i64` saturate instead of overflowing.
    pub fn per_night(&self, nights: i64) -> Money {
        let nights = nights.max(1);
        let half = nights / 2;
        let rounded = if self.0 >= 0 {
            self.0.saturating_add(half) / nights
        } else {
            self.0.saturating_sub(half) / nights
        };
        Money(rounded)
    }
}

/// Display uses the rupee sign, e.g. `₹6000` or `-₹250`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-₹{}", self.0.unsigned_abs())
        } else {
            write!(f, "₹{}", self.0)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, nights: i64) -> Self {
        Money(self.0 * nights)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
