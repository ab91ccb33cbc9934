//! # State Module
//!
//! Shared state handed to desk commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────────┐  │
//! │  │   DbState    │  │   ConfigState    │  │   SyncState              │  │
//! │  │              │  │                  │  │                          │  │
//! │  │  Database    │  │  RwLock<         │  │  OtaSyncEngine           │  │
//! │  │  (SQLite     │  │    AppConfig     │  │  RwLock<SyncStatusDto>   │  │
//! │  │   pool)      │  │  > + file path   │  │  Mutex<()> one run       │  │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • ConfigState: RwLock, written only by change_admin_password          │
//! │  • SyncState: at most one sync run at a time                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
mod db;
mod sync;

pub use config::{AppConfig, AppConfigDto, ConfigState};
pub use db::DbState;
pub use sync::{SyncState, SyncStatusDto};
