//! # OTA Sync State
//!
//! Holds the sync engine and what the last run did.
//!
//! Runs are serialized: a second "Sync OTA" press while one is in flight is
//! refused rather than queued, so two runs never plan against the same
//! snapshot.

use chrono::Local;
use serde::Serialize;
use std::sync::RwLock;
use swarna_core::format_timestamp;
use swarna_sync::{OtaSyncEngine, SyncReport, SyncResult};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// What the dashboard shows about OTA sync.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatusDto {
    /// Finish time of the last run (local, `YYYY-MM-DDTHH:MM:SS`).
    pub last_run_at: Option<String>,

    pub last_report: Option<SyncReport>,

    /// Set when the last run failed; cleared by the next success.
    pub last_error: Option<String>,

    /// Channels the next run will fetch.
    pub channels: Vec<String>,

    pub is_running: bool,
}

pub struct SyncState {
    engine: OtaSyncEngine,
    status: RwLock<SyncStatusDto>,
    running: Mutex<()>,
}

impl SyncState {
    pub fn new(engine: OtaSyncEngine) -> Self {
        let channels = engine
            .config()
            .enabled_channels()
            .map(|c| c.platform.name().to_string())
            .collect();

        SyncState {
            engine,
            status: RwLock::new(SyncStatusDto {
                channels,
                ..SyncStatusDto::default()
            }),
            running: Mutex::new(()),
        }
    }

    pub fn get_status(&self) -> SyncStatusDto {
        let mut status = self
            .status
            .read()
            .map(|s| s.clone())
            .unwrap_or_default();
        status.is_running = self.is_running();
        status
    }

    pub fn is_running(&self) -> bool {
        self.running.try_lock().is_err()
    }

    /// Runs one sync and records the outcome.
    ///
    /// Returns `None` when a run is already in progress.
    pub async fn run(&self) -> Option<SyncResult<SyncReport>> {
        let Ok(_guard) = self.running.try_lock() else {
            debug!("OTA sync already running, ignoring request");
            return None;
        };

        info!("Starting OTA sync");
        let result = self.engine.sync_external_bookings().await;
        self.record(&result);
        Some(result)
    }

    fn record(&self, result: &SyncResult<SyncReport>) {
        if let Ok(mut status) = self.status.write() {
            status.last_run_at = Some(format_timestamp(&Local::now().naive_local()));
            match result {
                Ok(report) => {
                    status.last_report = Some(report.clone());
                    status.last_error = None;
                }
                Err(e) => status.last_error = Some(e.to_string()),
            }
        }
    }
}
