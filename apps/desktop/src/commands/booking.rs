//! # Booking Commands
//!
//! Save, edit, delete and list guest stays.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    save_booking(draft, editingId, force)                │
//! │                                                                         │
//! │  BookingDraft from the form                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prepare_booking(draft, all bookings, editingId)                        │
//! │       │   invalid ──────────────────────────────► VALIDATION_ERROR     │
//! │       ▼                                                                 │
//! │  conflicts and !force ──────────────────────────► ConflictWarning      │
//! │       │                                            (desk confirms,     │
//! │       ▼                                             calls again with   │
//! │  ID scan is a new upload? ──► DocumentStore          force = true)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert (new) or update (editing) ──────────────► Saved { id }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::documents::{DocumentMeta, DocumentStore};
use crate::error::ApiError;
use crate::state::DbState;
use swarna_core::booking::{prepare_booking, BookingDraft, PreparedBooking, RoomConflict};
use swarna_core::search::{page_bookings, BookingFilter, BookingPage};
use swarna_core::validation::validate_search_query;
use swarna_core::{Booking, GuestProfile};
use swarna_db::BookingField;

/// Result of a save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SaveOutcome {
    Saved { id: i64, booking: Booking },
    /// Not saved. The room is taken for part of the stay.
    ConflictWarning { conflicts: Vec<RoomConflict> },
}

/// New check-out and nights for "check out now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutDto {
    pub check_out: NaiveDateTime,
    pub days: i64,
}

async fn require_booking(db: &DbState, id: i64) -> Result<Booking, ApiError> {
    db.inner()
        .bookings()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", &id.to_string()))
}

/// Derived fields and conflicts for the form, without saving.
pub async fn preview_booking(
    db: &DbState,
    draft: BookingDraft,
    editing_id: Option<i64>,
) -> Result<PreparedBooking, ApiError> {
    let existing = db.inner().bookings().list_all().await?;
    Ok(prepare_booking(&draft, &existing, editing_id)?)
}

/// Saves a new booking or an edit.
///
/// ## Arguments
/// * `editing_id` - The booking being edited, or `None` for a new one
/// * `force` - Save even when the room is already taken
pub async fn save_booking(
    db: &DbState,
    docs: &DocumentStore,
    draft: BookingDraft,
    editing_id: Option<i64>,
    force: bool,
) -> Result<SaveOutcome, ApiError> {
    let previous = match editing_id {
        Some(id) => Some(require_booking(db, id).await?),
        None => None,
    };

    let existing = db.inner().bookings().list_all().await?;
    let prepared = prepare_booking(&draft, &existing, editing_id)?;

    if prepared.has_conflict() {
        if !force {
            debug!(
                room = %prepared.booking.room,
                conflicts = prepared.conflicts.len(),
                "Booking overlaps existing stays"
            );
            return Ok(SaveOutcome::ConflictWarning {
                conflicts: prepared.conflicts,
            });
        }
        warn!(
            room = %prepared.booking.room,
            conflicts = prepared.conflicts.len(),
            "Saving booking over a room conflict"
        );
    }

    let mut booking = prepared.booking;
    booking.document_path = match booking.document_path.take() {
        Some(value) if value.trim().is_empty() => None,
        Some(value) if docs.is_stored_path(&value) => Some(value),
        Some(blob) => {
            let meta = DocumentMeta {
                guest_name: &booking.name,
                check_in: booking.check_in,
                room: &booking.room,
                extension: booking.file_ext.as_deref(),
            };
            Some(docs.store(&blob, &meta)?.display().to_string())
        }
        // An edit that did not touch the ID keeps the one on file.
        None => previous.as_ref().and_then(|b| b.document_path.clone()),
    };

    let repo = db.inner().bookings();
    let id = match editing_id {
        Some(id) => {
            repo.update(id, &booking).await?;
            id
        }
        None => repo.insert(&booking).await?,
    };
    booking.id = id;

    info!(id, room = %booking.room, days = booking.days, "Booking saved");
    Ok(SaveOutcome::Saved { id, booking })
}

pub async fn get_booking(db: &DbState, id: i64) -> Result<Booking, ApiError> {
    require_booking(db, id).await
}

/// Removes a booking. The ID scan on disk is left in place.
pub async fn delete_booking(db: &DbState, id: i64) -> Result<(), ApiError> {
    Ok(db.inner().bookings().delete(id).await?)
}

/// One page of the booking table, newest first.
pub async fn list_bookings(db: &DbState, filter: BookingFilter) -> Result<BookingPage, ApiError> {
    let filter = BookingFilter {
        search: validate_search_query(&filter.search)?,
        ..filter
    };
    let bookings = db.inner().bookings().list_all().await?;
    Ok(page_bookings(bookings, &filter))
}

/// Identity details from the guest's most recent stay, for autofill.
pub async fn lookup_guest(db: &DbState, mobile: String) -> Result<Option<GuestProfile>, ApiError> {
    let found = db
        .inner()
        .bookings()
        .find_by_field(BookingField::Mobile, &mobile)
        .await?;
    Ok(found.as_ref().map(GuestProfile::from))
}

/// Closes a stay at the current local time.
pub fn check_out_now(check_in: NaiveDateTime) -> Result<CheckOutDto, ApiError> {
    let (check_out, days) =
        swarna_core::booking::check_out_now(check_in, Local::now().naive_local())?;
    Ok(CheckOutDto { check_out, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{Duration, NaiveDate};
    use swarna_core::SourceSelection;
    use swarna_db::{Database, DbConfig};

    async fn test_db() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn draft(room: &str, name: &str, check_in: NaiveDateTime, days: i64) -> BookingDraft {
        BookingDraft {
            room: room.into(),
            name: name.into(),
            mobile: "9876543210".into(),
            check_in: Some(check_in),
            days: Some(days),
            rent: 3000,
            advance: 2000,
            ..Default::default()
        }
    }

    fn saved(outcome: SaveOutcome) -> (i64, Booking) {
        match outcome {
            SaveOutcome::Saved { id, booking } => (id, booking),
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_booking_in_room_warns() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path());
        let db = test_db().await;

        let (first_id, first) = saved(
            save_booking(&db, &docs, draft("101", "Asha Rao", at(1, 12), 2), None, false)
                .await
                .unwrap(),
        );
        assert_eq!(first.check_out, at(3, 12));
        assert_eq!(first.total, 6000);
        assert_eq!(first.due, 4000);

        let outcome = save_booking(&db, &docs, draft("101", "Rahul", at(2, 10), 1), None, false)
            .await
            .unwrap();
        match outcome {
            SaveOutcome::ConflictWarning { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].booking_id, first_id);
                assert_eq!(conflicts[0].guest_name, "Asha Rao");
            }
            other => panic!("expected ConflictWarning, got {:?}", other),
        }
        assert_eq!(db.inner().bookings().count().await.unwrap(), 1);

        saved(
            save_booking(&db, &docs, draft("101", "Rahul", at(2, 10), 1), None, true)
                .await
                .unwrap(),
        );
        assert_eq!(db.inner().bookings().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_edit_does_not_conflict_with_itself() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path());
        let db = test_db().await;

        let (id, booking) = saved(
            save_booking(&db, &docs, draft("102", "Asha", at(1, 12), 2), None, false)
                .await
                .unwrap(),
        );

        let mut edit = BookingDraft::from_booking(&booking);
        edit.advance = 6000;
        let (edited_id, edited) =
            saved(save_booking(&db, &docs, edit, Some(id), false).await.unwrap());
        assert_eq!(edited_id, id);
        assert_eq!(edited.due, 0);
        assert_eq!(db.inner().bookings().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_editing_missing_booking() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path());
        let db = test_db().await;

        let err = save_booking(&db, &docs, draft("101", "Asha", at(1, 12), 1), Some(99), false)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path());
        let db = test_db().await;

        let mut bad = draft("101", "Asha", at(3, 12), 1);
        bad.days = None;
        bad.check_out = Some(at(2, 12));
        let err = save_booking(&db, &docs, bad, None, false).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(db.inner().bookings().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_id_scan_is_stored_once() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path().join("guest_docs"));
        let db = test_db().await;

        let mut with_scan = draft("201", "Asha Rao", at(1, 12), 1);
        with_scan.document_path = Some("data:image/png;base64,aGVsbG8=".into());
        with_scan.file_ext = Some("png".into());

        let (id, booking) =
            saved(save_booking(&db, &docs, with_scan, None, false).await.unwrap());
        let path = booking.document_path.clone().unwrap();
        assert!(path.ends_with("2025-03-01_201_Asha_Rao.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        // Re-saving carries the stored path back; it must not be decoded again.
        let mut edit = BookingDraft::from_booking(&booking);
        edit.days = Some(2);
        let (_, edited) = saved(save_booking(&db, &docs, edit, Some(id), false).await.unwrap());
        assert_eq!(edited.document_path.as_deref(), Some(path.as_str()));

        // An edit without the field keeps the scan on file.
        let mut no_scan = BookingDraft::from_booking(&edited);
        no_scan.document_path = None;
        let (_, kept) = saved(save_booking(&db, &docs, no_scan, Some(id), false).await.unwrap());
        assert_eq!(kept.document_path.as_deref(), Some(path.as_str()));
    }

    #[tokio::test]
    async fn test_scan_from_previous_folder_survives_edit() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path().join("guest_docs"));
        let db = test_db().await;

        let mut with_scan = draft("202", "Rahul Mehta", at(1, 12), 1);
        with_scan.document_path = Some("aGVsbG8=".into());
        let (id, booking) =
            saved(save_booking(&db, &docs, with_scan, None, false).await.unwrap());
        let path = booking.document_path.clone().unwrap();

        docs.relocate(dir.path().join("scans")).unwrap();

        let mut edit = BookingDraft::from_booking(&booking);
        edit.days = Some(3);
        let (_, edited) = saved(save_booking(&db, &docs, edit, Some(id), false).await.unwrap());
        assert_eq!(edited.document_path.as_deref(), Some(path.as_str()));
        assert_eq!(std::fs::read_dir(dir.path().join("scans")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_list_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path());
        let db = test_db().await;

        for (i, name) in ["Asha", "Rahul", "Meera"].iter().enumerate() {
            let mut d = draft("103", name, at(1, 12) + Duration::days(2 * i as i64), 1);
            d.source = SourceSelection::agent("Ravi Travels");
            d.email = format!("{}@example.com", name.to_lowercase());
            save_booking(&db, &docs, d, None, false).await.unwrap();
        }

        let page = list_bookings(
            &db,
            BookingFilter {
                search: "rahul".into(),
                page: 1,
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.bookings[0].name, "Rahul");

        let everyone = list_bookings(&db, BookingFilter::default()).await.unwrap();
        assert_eq!(everyone.total_matches, 3);
        assert_eq!(everyone.bookings[0].name, "Meera");

        let guest = lookup_guest(&db, "9876543210".into()).await.unwrap().unwrap();
        assert_eq!(guest.name, "Meera");
        assert_eq!(guest.email, "meera@example.com");
        assert!(lookup_guest(&db, "1111111111".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_booking() {
        let dir = tempfile::tempdir().unwrap();
        let docs = DocumentStore::new(dir.path());
        let db = test_db().await;

        let (id, _) = saved(
            save_booking(&db, &docs, draft("104", "Asha", at(1, 12), 1), None, false)
                .await
                .unwrap(),
        );
        delete_booking(&db, id).await.unwrap();
        assert_eq!(get_booking(&db, id).await.unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(delete_booking(&db, id).await.unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_check_out_now() {
        let check_in = Local::now().naive_local() - Duration::hours(50);
        let result = check_out_now(check_in).unwrap();
        assert_eq!(result.days, 3);
        assert!(result.check_out > check_in);

        let future = Local::now().naive_local() + Duration::days(1);
        assert_eq!(check_out_now(future).unwrap_err().code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_outcome_shape() {
        let json = serde_json::to_value(SaveOutcome::ConflictWarning { conflicts: vec![] }).unwrap();
        assert_eq!(json["status"], "conflictWarning");
    }
}
