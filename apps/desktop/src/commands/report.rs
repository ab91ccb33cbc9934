//! # Report Commands
//!
//! Dashboard figures, computed fresh from the ledger on every call.

use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use swarna_core::report::{aggregate, Report, ReportPeriod};

/// Dashboard report.
///
/// `period` limits the per-agent and per-room views; the summary, monthly
/// series and source breakdown always cover every booking.
pub async fn get_report(db: &DbState, period: Option<ReportPeriod>) -> Result<Report, ApiError> {
    let start = Instant::now();
    let ledger = db.inner().bookings().list_ledger().await?;
    let report = aggregate(&ledger, period);

    debug!(
        rows = ledger.len(),
        ?period,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Report aggregated"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::booking::save_booking;
    use crate::documents::DocumentStore;
    use chrono::NaiveDate;
    use swarna_core::booking::BookingDraft;
    use swarna_core::SourceSelection;
    use swarna_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_report_over_saved_bookings() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path());
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());

        let stays = [
            ("101", 1, SourceSelection::walk_in(), 0),
            ("102", 1, SourceSelection::ota("Agoda"), 500),
            ("101", 10, SourceSelection::agent("Ravi Travels"), 300),
        ];
        for (room, day, source, commission) in stays {
            let draft = BookingDraft {
                room: room.into(),
                name: "Guest".into(),
                check_in: NaiveDate::from_ymd_opt(2025, 3, day)
                    .unwrap()
                    .and_hms_opt(12, 0, 0),
                days: Some(2),
                rent: 3000,
                advance: 1000,
                commission,
                source,
                ..Default::default()
            };
            save_booking(&db, &docs, draft, None, false).await.unwrap();
        }

        let report = get_report(&db, Some(ReportPeriod::Month { year: 2025, month: 3 }))
            .await
            .unwrap();
        assert_eq!(report.summary.total_bookings, 3);
        assert_eq!(report.summary.total_revenue, 18000);
        assert_eq!(report.summary.total_due, 15000);
        assert_eq!(report.summary.total_commission, 800);
        assert_eq!(report.summary.net_profit, 17200);

        let ota = report
            .source_breakdown
            .iter()
            .find(|s| s.source == "OTA")
            .unwrap();
        assert_eq!(ota.count, 1);
        assert!(report
            .agent_performance
            .iter()
            .any(|a| a.ref_by == "OTA - Agoda"));

        let empty = get_report(&db, Some(ReportPeriod::Year { year: 2024 })).await.unwrap();
        assert_eq!(empty.summary.total_bookings, 3);
        assert!(empty.agent_performance.is_empty());
    }
}
