//! # Booking Engine
//!
//! Turns what the desk typed into a complete, consistent booking.
//!
//! ## One Pure Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      prepare_booking()                                  │
//! │                                                                         │
//! │  BookingDraft ──► 1. required fields (room, name, checkIn)             │
//! │                   2. amounts in range                                  │
//! │                   3. stay:  days given? checkOut = checkIn + days      │
//! │                             checkOut given? days = ceil(Δ / 24h)       │
//! │                             checkOut <= checkIn → InvalidStayDuration  │
//! │                   4. billing: total = days × rent                      │
//! │                               due   = total − advance                  │
//! │                   5. refBy from the source picker                      │
//! │                   6. same-room overlap scan (real rooms only)          │
//! │                              │                                          │
//! │                              ▼                                          │
//! │              PreparedBooking { booking, conflicts }                    │
//! │                                                                         │
//! │  Every derived field is recomputed on every call, so the result can    │
//! │  never carry a total/due that is stale relative to days/rent/advance.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conflicts are warnings. The caller decides whether to save anyway.

use chrono::{Days, NaiveDateTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{
    is_unassigned_room, Booking, BookingSource, IdType, PaymentMode, RoomRate, SourceSelection,
    UNSAVED_BOOKING_ID,
};
use crate::validation::{validate_amount, validate_required, ValidationResult};
use crate::MAX_STAY_NIGHTS;

const SECONDS_PER_DAY: i64 = 86_400;

// =============================================================================
// Draft
// =============================================================================

/// Raw booking form input.
///
/// Either `check_out` or `days` may be filled in; `check_out` wins when both are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDraft {
    pub room: String,
    pub name: String,
    pub mobile: String,
    pub email: String,
    #[ts(as = "String")]
    pub id_type: IdType,
    pub id_number: String,
    #[serde(rename = "fileBase64")]
    pub document_path: Option<String>,
    pub file_ext: Option<String>,

    #[ts(as = "Option<String>")]
    pub check_in: Option<NaiveDateTime>,
    #[ts(as = "Option<String>")]
    pub check_out: Option<NaiveDateTime>,
    pub days: Option<i64>,

    pub rent: i64,
    pub advance: i64,
    pub commission: i64,

    pub source: SourceSelection,
    #[ts(as = "String")]
    pub payment_mode: PaymentMode,
    pub payment_ref: String,
}

impl BookingDraft {
    /// Selects a room, defaulting the rent from the catalog.
    ///
    /// The rate is copied, so later catalog edits never change this booking.
    /// Rooms missing from the catalog keep whatever rent was already typed.
    pub fn select_room(&mut self, room: &str, catalog: &RateCatalog) {
        self.room = room.to_string();
        if let Some(rate) = catalog.rate_for(room) {
            self.rent = rate.units();
        }
    }

    /// Pre-fills a draft from an existing booking, for the edit form.
    pub fn from_booking(b: &Booking) -> Self {
        let source = match &b.ref_by {
            BookingSource::Agent(name) => SourceSelection::agent(name.clone()),
            BookingSource::Ota(platform) => SourceSelection::ota(platform.clone()),
            BookingSource::WalkIn | BookingSource::Other(_) => SourceSelection::walk_in(),
        };

        BookingDraft {
            room: b.room.clone(),
            name: b.name.clone(),
            mobile: b.mobile.clone(),
            email: b.email.clone(),
            id_type: b.id_type.clone(),
            id_number: b.id_number.clone(),
            document_path: b.document_path.clone(),
            file_ext: b.file_ext.clone(),
            check_in: Some(b.check_in),
            check_out: Some(b.check_out),
            days: Some(b.days),
            rent: b.rent,
            advance: b.advance,
            commission: b.commission,
            source,
            payment_mode: b.payment_mode.clone(),
            payment_ref: b.payment_ref.clone(),
        }
    }
}

// =============================================================================
// Result Types
// =============================================================================

/// An existing booking that overlaps the one being prepared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RoomConflict {
    pub booking_id: i64,
    pub guest_name: String,
    pub room: String,
    #[ts(as = "String")]
    pub check_in: NaiveDateTime,
    #[ts(as = "String")]
    pub check_out: NaiveDateTime,
}

impl From<&Booking> for RoomConflict {
    fn from(b: &Booking) -> Self {
        RoomConflict {
            booking_id: b.id,
            guest_name: b.name.clone(),
            room: b.room.clone(),
            check_in: b.check_in,
            check_out: b.check_out,
        }
    }
}

/// Output of [`prepare_booking`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PreparedBooking {
    /// Ready to persist. Carries the editing id, or 0 for a new booking.
    pub booking: Booking,

    /// Overlapping bookings in the same room, oldest stay first.
    pub conflicts: Vec<RoomConflict>,
}

impl PreparedBooking {
    #[inline]
    pub fn has_conflict(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn first_conflict(&self) -> Option<&RoomConflict> {
        self.conflicts.first()
    }
}

// =============================================================================
// Stay Arithmetic
// =============================================================================

/// Nights between two instants: `ceil(Δ / 24h)`, never less than 1.
///
/// ```rust
/// use chrono::NaiveDate;
/// use swarna_core::booking::stay_nights;
///
/// let d = |day, h| NaiveDate::from_ymd_opt(2025, 1, day).unwrap().and_hms_opt(h, 0, 0).unwrap();
/// assert_eq!(stay_nights(d(1, 12), d(3, 12)), 2);
/// assert_eq!(stay_nights(d(1, 12), d(3, 13)), 3);
/// assert_eq!(stay_nights(d(1, 12), d(1, 18)), 1);
/// ```
pub fn stay_nights(check_in: NaiveDateTime, check_out: NaiveDateTime) -> i64 {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    ((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY).max(1)
}

/// Half-open interval overlap: `[a_start, a_end)` vs `[b_start, b_end)`.
///
/// Symmetric, and a stay ending exactly when another begins does not overlap.
#[inline]
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Resolves check-out and nights from whichever of `check_out`/`days` was given.
fn resolve_stay(
    check_in: NaiveDateTime,
    check_out: Option<NaiveDateTime>,
    days: Option<i64>,
) -> ValidationResult<(NaiveDateTime, i64)> {
    let check_out = match (check_out, days) {
        (Some(out), _) => out,
        (None, Some(days)) if days <= 0 => {
            return Err(ValidationError::InvalidStayDuration {
                check_in,
                check_out: check_in,
            });
        }
        (None, Some(days)) => {
            if days > MAX_STAY_NIGHTS {
                return Err(ValidationError::OutOfRange {
                    field: "days".to_string(),
                    min: 1,
                    max: MAX_STAY_NIGHTS,
                });
            }
            // Calendar days: the check-in wall-clock time is kept.
            check_in
                .checked_add_days(Days::new(days as u64))
                .ok_or_else(|| ValidationError::InvalidFormat {
                    field: "days".to_string(),
                    reason: "check-out falls outside the supported calendar".to_string(),
                })?
        }
        (None, None) => {
            return Err(ValidationError::Required {
                field: "checkOut".to_string(),
            });
        }
    };

    if check_out <= check_in {
        return Err(ValidationError::InvalidStayDuration {
            check_in,
            check_out,
        });
    }

    let nights = stay_nights(check_in, check_out);
    if nights > MAX_STAY_NIGHTS {
        return Err(ValidationError::OutOfRange {
            field: "days".to_string(),
            min: 1,
            max: MAX_STAY_NIGHTS,
        });
    }

    Ok((check_out, nights))
}

/// "Check out now": closes a stay at `now`.
///
/// Returns the new check-out and recomputed nights. Fails when `now` is not
/// after check-in.
pub fn check_out_now(
    check_in: NaiveDateTime,
    now: NaiveDateTime,
) -> ValidationResult<(NaiveDateTime, i64)> {
    resolve_stay(check_in, Some(now), None)
}

// =============================================================================
// Conflict Detection
// =============================================================================

/// Bookings in `room` whose stay overlaps `[check_in, check_out)`.
///
/// Placeholder rooms never conflict. `editing_id` is skipped so a booking is
/// never reported against itself.
pub fn find_conflicts(
    room: &str,
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
    existing: &[Booking],
    editing_id: Option<i64>,
) -> Vec<RoomConflict> {
    let room = room.trim();
    if is_unassigned_room(room) {
        return Vec::new();
    }

    let mut conflicts: Vec<RoomConflict> = existing
        .iter()
        .filter(|b| Some(b.id) != editing_id)
        .filter(|b| b.room.trim() == room)
        .filter(|b| overlaps(check_in, check_out, b.check_in, b.check_out))
        .map(RoomConflict::from)
        .collect();

    conflicts.sort_by(|a, b| a.check_in.cmp(&b.check_in).then(a.booking_id.cmp(&b.booking_id)));
    conflicts
}

// =============================================================================
// Prepare
// =============================================================================

/// Validates a draft and derives every computed field.
///
/// ## Arguments
/// * `draft` - What the desk entered
/// * `existing` - Full snapshot of stored bookings (for the overlap scan)
/// * `editing_id` - Id of the booking being edited, if any
///
/// ## Returns
/// * `Ok(PreparedBooking)` - Possibly with conflicts to confirm
/// * `Err(ValidationError)` - Nothing should be persisted
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use swarna_core::booking::{prepare_booking, BookingDraft};
///
/// let draft = BookingDraft {
///     room: "101".into(),
///     name: "Asha".into(),
///     check_in: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(12, 0, 0),
///     days: Some(3),
///     rent: 2000,
///     advance: 1000,
///     ..Default::default()
/// };
///
/// let prepared = prepare_booking(&draft, &[], None).unwrap();
/// assert_eq!(prepared.booking.total, 6000);
/// assert_eq!(prepared.booking.due, 5000);
/// ```
pub fn prepare_booking(
    draft: &BookingDraft,
    existing: &[Booking],
    editing_id: Option<i64>,
) -> ValidationResult<PreparedBooking> {
    validate_required("room", &draft.room)?;
    validate_required("name", &draft.name)?;
    let check_in = draft.check_in.ok_or_else(|| ValidationError::Required {
        field: "checkIn".to_string(),
    })?;

    validate_amount("rent", draft.rent)?;
    validate_amount("advance", draft.advance)?;
    validate_amount("commission", draft.commission)?;

    let (check_out, days) = resolve_stay(check_in, draft.check_out, draft.days)?;

    let total = Money::from_units(draft.rent) * days;
    let due = total - Money::from_units(draft.advance);

    let room = draft.room.trim().to_string();
    let conflicts = find_conflicts(&room, check_in, check_out, existing, editing_id);

    let booking = Booking {
        id: editing_id.unwrap_or(UNSAVED_BOOKING_ID),
        room,
        name: draft.name.trim().to_string(),
        mobile: draft.mobile.trim().to_string(),
        email: draft.email.trim().to_string(),
        id_type: draft.id_type.clone(),
        id_number: draft.id_number.trim().to_string(),
        document_path: draft.document_path.clone(),
        file_ext: draft.file_ext.clone(),
        check_in,
        check_out,
        days,
        rent: draft.rent,
        advance: draft.advance,
        total: total.units(),
        due: due.units(),
        commission: draft.commission,
        ref_by: draft.source.to_source(),
        payment_mode: draft.payment_mode.clone(),
        payment_ref: draft.payment_ref.trim().to_string(),
        created_at: None,
    };

    Ok(PreparedBooking { booking, conflicts })
}

// =============================================================================
// Rate Catalog
// =============================================================================

/// Read-only view over the room rate list.
#[derive(Debug, Clone, Default)]
pub struct RateCatalog {
    rates: Vec<RoomRate>,
}

impl RateCatalog {
    pub fn new(rates: Vec<RoomRate>) -> Self {
        RateCatalog { rates }
    }

    pub fn rooms(&self) -> &[RoomRate] {
        &self.rates
    }

    pub fn get(&self, room_no: &str) -> Option<&RoomRate> {
        let room_no = room_no.trim();
        self.rates.iter().find(|r| r.room_no == room_no)
    }

    /// Nightly rate for a room, if the room is in the catalog.
    pub fn rate_for(&self, room_no: &str) -> Option<Money> {
        self.get(room_no).map(RoomRate::rate)
    }

    /// Distinct room types in catalog order.
    pub fn room_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for rate in &self.rates {
            if !types.contains(&rate.room_type.as_str()) {
                types.push(&rate.room_type);
            }
        }
        types
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
