//! # Swarna Desktop Library
//!
//! Application layer for the Swarna Villa front desk. The UI shell calls the
//! functions in [`commands`]; this crate owns startup, shared state and the
//! services those commands lean on.
//!
//! ## Module Organization
//! ```text
//! swarna_desktop_lib/
//! ├── lib.rs          ◄─── You are here (startup, AppContext)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── config.rs   ◄─── config.toml, admin password hash
//! │   └── sync.rs     ◄─── OTA sync engine + last run
//! ├── commands/       ◄─── Everything the UI can invoke
//! ├── documents.rs    ◄─── ID scan storage
//! ├── mailer.rs       ◄─── Invoice email collaborator
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod documents;
pub mod error;
pub mod mailer;
pub mod state;

use chrono::Local;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use documents::DocumentStore;
use error::ApiError;
use mailer::{DisabledMailer, InvoiceMailer};
use state::{ConfigState, DbState, SyncState};
use swarna_db::{Database, DbConfig};
use swarna_sync::{OtaConfig, OtaSyncEngine, ReservationFeed, SimulatedFeed};

const DATABASE_FILE: &str = "swarna.db";
const GUEST_DOCS_DIR: &str = "guest_docs";

/// Everything the commands need, opened once at startup.
pub struct AppContext {
    pub db: DbState,
    pub config: ConfigState,
    pub sync: SyncState,
    pub docs: DocumentStore,
    pub mailer: Arc<dyn InvoiceMailer>,
}

impl AppContext {
    /// Opens the app with its default locations.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Application Startup                               │
    /// │                                                                         │
    /// │  1. Load config.toml + ota.toml (defaults when missing or broken)       │
    /// │                                                                         │
    /// │  2. Determine Database Path ──────────────────────────────────────────► │
    /// │     • SWARNA_DB_PATH, else the platform data dir                        │
    /// │                                                                         │
    /// │  3. Connect to Database ──────────────────────────────────────────────► │
    /// │     • SQLite with WAL mode, pending migrations applied                  │
    /// │                                                                         │
    /// │  4. Initialize State Objects ─────────────────────────────────────────► │
    /// │     • DbState, ConfigState, SyncState, DocumentStore, mailer            │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn bootstrap() -> Result<Self, ApiError> {
        let config = ConfigState::load(ConfigState::default_path());
        let ota = OtaConfig::load_or_default(None);

        let db_path = get_database_path()?;
        info!(?db_path, "Database path determined");

        let feed = Arc::new(SimulatedFeed::new(Local::now().date_naive()));
        AppContext::open(DbConfig::new(db_path), config, ota, feed).await
    }

    /// Opens the app against an explicit database and configuration.
    pub async fn open(
        db_config: DbConfig,
        config: ConfigState,
        ota: OtaConfig,
        feed: Arc<dyn ReservationFeed>,
    ) -> Result<Self, ApiError> {
        let docs_root = config
            .get()
            .guest_docs_dir
            .unwrap_or_else(|| default_docs_dir(&db_config.database_path));

        let db = DbState::new(Database::new(db_config).await?);
        info!("Database connected and migrations applied");

        let engine = OtaSyncEngine::new(db.shared(), Arc::new(ota), feed);

        info!(docs = %docs_root.display(), "State initialized");
        Ok(AppContext {
            sync: SyncState::new(engine),
            docs: DocumentStore::new(docs_root),
            mailer: Arc::new(DisabledMailer),
            db,
            config,
        })
    }

    /// Swaps in a real email transport.
    pub fn with_mailer(mut self, mailer: Arc<dyn InvoiceMailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub async fn shutdown(&self) {
        self.db.inner().close().await;
    }
}

/// ID scans live beside the database unless configured otherwise.
fn default_docs_dir(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(GUEST_DOCS_DIR),
        _ => PathBuf::from(GUEST_DOCS_DIR),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=swarna=trace` - Show trace for swarna crates only
/// - Default: INFO, with debug for swarna crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,swarna=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Determines the database file path based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.swarna.pms/swarna.db`
/// - **Windows**: `%APPDATA%\swarna\pms\data\swarna.db`
/// - **Linux**: `~/.local/share/pms/swarna.db`
///
/// ## Development Override
/// Set `SWARNA_DB_PATH` environment variable to use a custom path.
pub fn get_database_path() -> Result<PathBuf, ApiError> {
    if let Ok(path) = std::env::var("SWARNA_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "swarna", "pms")
        .ok_or_else(|| ApiError::config("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ApiError::config(format!("Could not create {}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join(DATABASE_FILE))
}
