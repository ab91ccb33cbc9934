//! # swarna-sync: OTA Sync Engine for Swarna Villa
//!
//! Pulls reservations from the booking channels (Booking.com, Agoda,
//! MakeMyTrip and friends) and imports them as bookings with a placeholder
//! room, all or nothing.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OTA Sync Architecture                            │
//! │                                                                         │
//! │  Desk presses "Sync OTA"                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                        OtaSyncEngine                             │  │
//! │  └──────┬──────────────────────┬───────────────────────┬────────────┘  │
//! │         ▼                      ▼                       ▼               │
//! │  ┌────────────────┐  ┌──────────────────┐  ┌──────────────────────┐   │
//! │  │   OtaConfig    │  │ ReservationFeed  │  │  swarna-db           │   │
//! │  │                │  │                  │  │                      │   │
//! │  │ ota.toml +     │  │ SimulatedFeed or │  │ insert_ota_batch()   │   │
//! │  │ SWARNA_OTA_*   │  │ a real client    │  │ one transaction      │   │
//! │  └────────────────┘  └──────────────────┘  └──────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Channel list and fetch timeout
//! - [`error`] - Sync error types
//! - [`fetch`] - The feed collaborator and the simulated feed
//! - [`engine`] - The sync run itself
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use swarna_sync::{OtaConfig, OtaSyncEngine, SimulatedFeed};
//!
//! let config = Arc::new(OtaConfig::load_or_default(None));
//! let feed = Arc::new(SimulatedFeed::new(today));
//! let engine = OtaSyncEngine::new(db, config, feed);
//!
//! let report = engine.sync_external_bookings().await?;
//! println!("{}", report.summary());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ChannelConfig, OtaConfig, SyncSettings};
pub use engine::{OtaSyncEngine, SyncReport};
pub use error::{SyncError, SyncResult};
pub use fetch::{ReservationFeed, SimulatedFeed, UnreachableFeed};
