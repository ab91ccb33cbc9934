//! # swarna-core: Front-Desk Logic for Swarna Villa
//!
//! Everything the desk decides, as pure functions over plain data.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Swarna Villa Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desktop UI shell                             │   │
//! │  │    Booking form ──► Booking table ──► Dashboard ──► Invoice    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    swarna-desktop commands                      │   │
//! │  │    save_booking, sync_ota_bookings, get_report, etc.           │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼───────────────────┐   │
//! │  │  ★ swarna-core (THIS) ★     │  │  swarna-sync                   │   │
//! │  │                             │  │  channel feeds, atomic import  │   │
//! │  │  booking  ota  report       │  └────────────┬───────────────────┘   │
//! │  │  money  types  validation   │               │                        │
//! │  │                             │  ┌────────────▼───────────────────┐   │
//! │  │  NO I/O • PURE FUNCTIONS    │  │  swarna-db                     │   │
//! │  └─────────────────────────────┘  │  SQLite bookings + rates       │   │
//! │                                   └────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Booking, RoomRate, BookingSource and the legacy string enums
//! - [`money`] - Whole-rupee Money
//! - [`booking`] - The Booking Engine: derivation and room-conflict scan
//! - [`ota`] - Channel payload normalization and import planning
//! - [`report`] - Dashboard aggregation
//! - [`search`] - Booking table search and paging
//! - [`invoice`] - Invoice data and email text
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use swarna_core::booking::{prepare_booking, BookingDraft};
//!
//! let first = BookingDraft {
//!     room: "101".into(),
//!     name: "Asha".into(),
//!     check_in: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(12, 0, 0),
//!     days: Some(2),
//!     rent: 3000,
//!     advance: 2000,
//!     ..Default::default()
//! };
//! let mut saved = prepare_booking(&first, &[], None).unwrap().booking;
//! assert_eq!(saved.due, 4000);
//! saved.id = 1;
//!
//! let second = BookingDraft {
//!     check_in: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap().and_hms_opt(10, 0, 0),
//!     days: Some(1),
//!     ..first
//! };
//! let prepared = prepare_booking(&second, &[saved], None).unwrap();
//! assert_eq!(prepared.first_conflict().unwrap().booking_id, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod booking;
pub mod error;
pub mod invoice;
pub mod money;
pub mod ota;
pub mod report;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use booking::{prepare_booking, BookingDraft, PreparedBooking, RateCatalog, RoomConflict};
pub use error::ValidationError;
pub use money::Money;
pub use ota::{normalize, plan_ota_import, ImportPlan, NormalizedReservation, OtaPlatform};
pub use report::{aggregate, Report, ReportPeriod};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest amount accepted for rent, advance or commission.
pub const MAX_AMOUNT: i64 = 10_000_000;

/// Longest stay the desk can enter in one booking.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Rows per page in the booking table.
pub const BOOKINGS_PAGE_SIZE: usize = 10;

/// Hour of day OTA arrivals and departures are placed at.
pub const OTA_ARRIVAL_HOUR: u32 = 12;

/// Room type used when a channel does not say which room was sold.
pub const DEFAULT_ROOM_TYPE: &str = "Standard";
