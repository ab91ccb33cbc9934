//! # OTA Sync Commands
//!
//! The dashboard's "Sync OTA" button and the sync status badge.

use serde::Serialize;

use crate::error::{ApiError, ErrorCode};
use crate::state::{SyncState, SyncStatusDto};
use swarna_sync::SyncReport;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcomeDto {
    pub report: SyncReport,
    /// e.g. "3 of 5 OTA bookings added, 2 were duplicates"
    pub summary: String,
}

/// Pulls reservations from every enabled channel and saves the new ones.
///
/// A failed run saves nothing and can simply be retried.
pub async fn sync_ota_bookings(sync: &SyncState) -> Result<SyncOutcomeDto, ApiError> {
    let report = sync
        .run()
        .await
        .ok_or_else(|| ApiError::new(ErrorCode::SyncError, "An OTA sync is already running"))??;

    Ok(SyncOutcomeDto {
        summary: report.summary(),
        report,
    })
}

pub fn get_sync_status(sync: &SyncState) -> SyncStatusDto {
    sync.get_status()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DbState;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use swarna_db::{Database, DbConfig};
    use swarna_sync::{OtaConfig, OtaSyncEngine, SimulatedFeed, UnreachableFeed};

    async fn sync_state(feed_ok: bool) -> (DbState, SyncState) {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let engine = if feed_ok {
            let anchor = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
            OtaSyncEngine::new(
                db.shared(),
                Arc::new(OtaConfig::default()),
                Arc::new(SimulatedFeed::new(anchor)),
            )
        } else {
            OtaSyncEngine::new(
                db.shared(),
                Arc::new(OtaConfig::default()),
                Arc::new(UnreachableFeed),
            )
        };
        (db, SyncState::new(engine))
    }

    #[tokio::test]
    async fn test_sync_twice() {
        let (db, sync) = sync_state(true).await;

        let first = sync_ota_bookings(&sync).await.unwrap();
        assert_eq!(first.report.inserted, 7);

        let second = sync_ota_bookings(&sync).await.unwrap();
        assert_eq!(second.summary, "0 of 7 OTA bookings added, 7 were duplicates");
        assert_eq!(db.inner().bookings().count().await.unwrap(), 7);

        let status = get_sync_status(&sync);
        assert_eq!(status.last_report.unwrap().duplicates, 7);
        assert!(status.last_run_at.is_some());
        assert!(status.last_error.is_none());
        assert!(!status.is_running);
        assert_eq!(status.channels.len(), 6);
    }

    #[tokio::test]
    async fn test_failed_sync_is_recorded() {
        let (db, sync) = sync_state(false).await;

        let err = sync_ota_bookings(&sync).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SyncError);
        assert_eq!(db.inner().bookings().count().await.unwrap(), 0);

        let status = get_sync_status(&sync);
        assert!(status.last_error.is_some());
        assert!(status.last_report.is_none());
    }
}
