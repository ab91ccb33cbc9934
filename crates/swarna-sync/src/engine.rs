//! # OTA Sync Engine
//!
//! One sync run, start to finish.
//!
//! ## Sync Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       sync_external_bookings()                          │
//! │                                                                         │
//! │  1. Fetch    every enabled channel, under ONE overall timeout          │
//! │              any failure ─────────────────────────► Err, nothing saved │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Normalize  raw payload ─► NormalizedReservation (never fails)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. Plan     snapshot of stored bookings ─► ImportPlan                  │
//! │              (duplicates by paymentRef, rejects without id/check-in)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  4. Insert   one transaction, paymentRef re-checked inside it          │
//! │              any failure ─────────────────────────► rollback, Err      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SyncReport { fetched, inserted, duplicates, rejected }                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Re-running after a crash or a partial feed is safe: reservations already
//! committed are recognized by their payment reference and skipped.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use swarna_core::ota::{normalize, plan_ota_import, NormalizedReservation, RejectedReservation};
use swarna_db::Database;

use crate::config::OtaConfig;
use crate::error::{SyncError, SyncResult};
use crate::fetch::ReservationFeed;

// =============================================================================
// Sync Report
// =============================================================================

/// Outcome of a successful sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Reservations the channels returned.
    pub fetched: usize,
    /// New bookings committed.
    pub inserted: usize,
    /// Reservations skipped because their id was already stored.
    pub duplicates: usize,
    /// Reservations that could not become bookings.
    pub rejected: Vec<RejectedReservation>,
}

impl SyncReport {
    /// Desk message, e.g. "3 of 5 OTA bookings added, 2 were duplicates".
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} of {} OTA bookings added, {} were duplicates",
            self.inserted, self.fetched, self.duplicates
        );
        if !self.rejected.is_empty() {
            text.push_str(&format!(", {} could not be read", self.rejected.len()));
        }
        text
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Imports channel reservations into the booking store.
pub struct OtaSyncEngine {
    db: Arc<Database>,
    config: Arc<OtaConfig>,
    feed: Arc<dyn ReservationFeed>,
}

impl OtaSyncEngine {
    pub fn new(db: Arc<Database>, config: Arc<OtaConfig>, feed: Arc<dyn ReservationFeed>) -> Self {
        OtaSyncEngine { db, config, feed }
    }

    pub fn config(&self) -> &OtaConfig {
        &self.config
    }

    /// Runs one sync.
    ///
    /// ## Returns
    /// * `Ok(SyncReport)` - Counts per outcome; zero inserts is still success
    /// * `Err(SyncError)` - Nothing from this run was saved
    pub async fn sync_external_bookings(&self) -> SyncResult<SyncReport> {
        let timeout = self.config.fetch_timeout();
        let reservations = tokio::time::timeout(timeout, self.fetch_all())
            .await
            .map_err(|_| {
                warn!(secs = timeout.as_secs(), "OTA fetch timed out");
                SyncError::Timeout(timeout.as_secs())
            })??;

        let fetched = reservations.len();
        let existing = self.db.bookings().list_all().await?;
        let plan = plan_ota_import(reservations, &existing);

        for rejected in &plan.rejected {
            warn!(
                external_id = %rejected.external_id,
                platform = %rejected.source_platform,
                reason = %rejected.reason,
                "Reservation rejected"
            );
        }

        let inserted = self.db.bookings().insert_ota_batch(&plan.bookings).await?;

        // Anything planned but not inserted was caught by the in-transaction check.
        let report = SyncReport {
            fetched,
            inserted,
            duplicates: plan.duplicates.len() + plan.bookings.len().saturating_sub(inserted),
            rejected: plan.rejected,
        };

        info!(
            fetched = report.fetched,
            inserted = report.inserted,
            duplicates = report.duplicates,
            rejected = report.rejected.len(),
            "OTA sync complete"
        );
        Ok(report)
    }

    /// Fetches and normalizes every enabled channel, stopping at the first failure.
    async fn fetch_all(&self) -> SyncResult<Vec<NormalizedReservation>> {
        let mut channels = self.config.enabled_channels().peekable();
        if channels.peek().is_none() {
            return Err(SyncError::NoChannels);
        }

        let mut reservations = Vec::new();
        for channel in channels {
            let raw = self.feed.fetch_raw_reservations(channel).await?;
            debug!(platform = %channel.platform, count = raw.len(), "Channel fetched");
            reservations.extend(raw.iter().map(|r| normalize(r, &channel.platform)));
        }
        Ok(reservations)
    }
}
