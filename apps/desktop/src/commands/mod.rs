//! # Commands Module
//!
//! Everything the UI shell can ask the backend to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── booking.rs  ◄─── Save, edit, delete, list, guest autofill
//! ├── rate.rs     ◄─── Room rate catalog
//! ├── report.rs   ◄─── Dashboard aggregation
//! ├── ota.rs      ◄─── OTA sync and status
//! ├── invoice.rs  ◄─── Invoice data and email
//! ├── auth.rs     ◄─── Admin password
//! └── config.rs   ◄─── Settings, ID scan folder
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! async fn list_rates(db: &DbState)
//!
//! // Database plus the ID scan folder
//! async fn save_booking(db: &DbState, docs: &DocumentStore, ...)
//!
//! // Sync engine
//! async fn sync_ota_bookings(sync: &SyncState)
//! ```
//!
//! Every fallible command returns `Result<T, ApiError>`, which the shell
//! receives as `{ code, message }`.

pub mod auth;
pub mod booking;
pub mod config;
pub mod invoice;
pub mod ota;
pub mod rate;
pub mod report;

pub use auth::{change_admin_password, verify_admin_password};
pub use booking::{
    check_out_now, delete_booking, get_booking, list_bookings, lookup_guest, preview_booking,
    save_booking, CheckOutDto, SaveOutcome,
};
pub use config::{format_currency, get_config, set_guest_docs_dir};
pub use invoice::{email_invoice, get_invoice};
pub use ota::{get_sync_status, sync_ota_bookings, SyncOutcomeDto};
pub use rate::{add_rate, delete_rate, list_rates, list_room_types, update_rate};
pub use report::get_report;
