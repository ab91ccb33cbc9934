//! # Repository Module
//!
//! Database repository implementations for the front desk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command / sync engine                                                 │
//! │       │                                                                 │
//! │       │  db.bookings().list_all()                                      │
//! │       ▼                                                                 │
//! │  BookingRepository                 RateRepository                      │
//! │  ├── insert / update / delete      ├── list / get                      │
//! │  ├── list_all / get_by_id          ├── insert (duplicate → error)      │
//! │  ├── find_by_field                 └── update / delete                 │
//! │  ├── list_ledger                                                       │
//! │  └── insert_ota_batch (one transaction)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookingRepository`](booking::BookingRepository) - The booking record store
//! - [`RateRepository`](rate::RateRepository) - The room rate catalog

pub mod booking;
pub mod rate;
