//! # OTA Normalization
//!
//! Lifts channel-specific reservation payloads into one canonical shape, then
//! plans which of them become bookings.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        OTA Import (pure half)                           │
//! │                                                                         │
//! │  serde_json::Value ──► ExternalReservation::lift(platform)             │
//! │                         ├── BookingCom { reservation_id, booker ... }  │
//! │                         ├── Agoda      { BookingID, GuestDetails ... } │
//! │                         ├── MakeMyTrip { bookingId, guest ... }        │
//! │                         ├── Airbnb     { confirmation_code, nights }   │
//! │                         ├── Expedia    { itineraryId, primaryGuest }   │
//! │                         └── Unknown    { canonical keys, if present }  │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                        NormalizedReservation                            │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │  plan_ota_import() ──► ImportPlan { bookings, duplicates, rejected }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Extraction never fails. A missing or mistyped field becomes an empty
//! string, a zero price or an absent date. Whether the result is usable is
//! decided by [`plan_ota_import`], one reservation at a time.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{
    parse_lenient_amount, parse_timestamp, unassigned_room, Booking, BookingSource, IdType,
    PaymentMode, UNSAVED_BOOKING_ID,
};
use crate::{DEFAULT_ROOM_TYPE, MAX_AMOUNT, OTA_ARRIVAL_HOUR};

// =============================================================================
// Platform
// =============================================================================

/// A booking channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OtaPlatform {
    BookingCom,
    Agoda,
    MakeMyTrip,
    /// Same payload shape as MakeMyTrip.
    Goibibo,
    Airbnb,
    Expedia,
    /// Any channel without a dedicated extractor.
    Other(String),
}

impl OtaPlatform {
    /// Every channel with a dedicated extractor, in the order the desk lists them.
    pub const KNOWN: [OtaPlatform; 6] = [
        OtaPlatform::BookingCom,
        OtaPlatform::Agoda,
        OtaPlatform::MakeMyTrip,
        OtaPlatform::Goibibo,
        OtaPlatform::Airbnb,
        OtaPlatform::Expedia,
    ];

    /// Display name, as it appears after `"OTA - "` in `refBy`.
    pub fn name(&self) -> &str {
        match self {
            OtaPlatform::BookingCom => "Booking.com",
            OtaPlatform::Agoda => "Agoda",
            OtaPlatform::MakeMyTrip => "MakeMyTrip",
            OtaPlatform::Goibibo => "Goibibo",
            OtaPlatform::Airbnb => "Airbnb",
            OtaPlatform::Expedia => "Expedia",
            OtaPlatform::Other(name) => name,
        }
    }

    /// Parses a channel name, ignoring case, spaces and punctuation.
    ///
    /// ```rust
    /// use swarna_core::ota::OtaPlatform;
    ///
    /// assert_eq!(OtaPlatform::parse("booking.com"), OtaPlatform::BookingCom);
    /// assert_eq!(OtaPlatform::parse("Make My Trip"), OtaPlatform::MakeMyTrip);
    /// assert_eq!(OtaPlatform::parse("Hostelworld"), OtaPlatform::Other("Hostelworld".into()));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "bookingcom" | "booking" => OtaPlatform::BookingCom,
            "agoda" => OtaPlatform::Agoda,
            "makemytrip" | "mmt" => OtaPlatform::MakeMyTrip,
            "goibibo" => OtaPlatform::Goibibo,
            "airbnb" => OtaPlatform::Airbnb,
            "expedia" => OtaPlatform::Expedia,
            _ => OtaPlatform::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for OtaPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for OtaPlatform {
    fn from(raw: String) -> Self {
        OtaPlatform::parse(&raw)
    }
}

impl From<OtaPlatform> for String {
    fn from(platform: OtaPlatform) -> Self {
        platform.name().to_string()
    }
}

// =============================================================================
// Canonical Shape
// =============================================================================

/// A reservation in the shape every channel is normalized to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedReservation {
    pub external_id: String,
    pub guest_name: String,
    pub phone: String,
    pub room_type: String,
    #[ts(as = "Option<String>")]
    pub check_in: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub check_out: Option<NaiveDate>,
    /// Whole stay price in currency units.
    pub price: i64,
    pub source_platform: String,
}

// =============================================================================
// Lenient Field Access
// =============================================================================

/// Read-only cursor over a raw payload. Every accessor is total.
#[derive(Clone, Copy)]
struct Fields<'a>(&'a Value);

impl<'a> Fields<'a> {
    fn at(&self, path: &[&str]) -> Option<&'a Value> {
        let mut current = self.0;
        for key in path {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    fn text(&self, path: &[&str]) -> String {
        match self.at(path) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn amount(&self, path: &[&str]) -> i64 {
        match self.at(path) {
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.round() as i64)
                .unwrap_or(0),
            Some(Value::String(s)) => parse_lenient_amount(s),
            _ => 0,
        }
    }

    fn date(&self, path: &[&str]) -> Option<NaiveDate> {
        match self.at(path) {
            Some(Value::String(s)) => parse_reservation_date(s),
            _ => None,
        }
    }

    /// First non-empty text among several candidate paths.
    fn first_text(&self, paths: &[&[&str]]) -> String {
        paths
            .iter()
            .map(|p| self.text(p))
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }
}

/// Parses the date formats channels send: ISO date, Indian `DD-MM-YYYY`,
/// `DD/MM/YYYY` and full timestamps.
pub fn parse_reservation_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.date_naive());
    }
    parse_timestamp(raw).map(|at| at.date())
}

fn join_name(first: String, last: String) -> String {
    format!("{first} {last}").trim().to_string()
}

// =============================================================================
// Channel Payloads
// =============================================================================

/// Booking.com reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingComReservation {
    pub reservation_id: String,
    pub booker_first_name: String,
    pub booker_last_name: String,
    pub telephone: String,
    pub room_name: String,
    pub arrival_date: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub total_price: i64,
}

/// Agoda reservation (PascalCase keys).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgodaReservation {
    pub booking_id: String,
    pub guest_name: String,
    pub guest_phone: String,
    pub room_type: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub total_amount: i64,
}

/// MakeMyTrip / Goibibo reservation. Dates arrive as `DD-MM-YYYY`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakeMyTripReservation {
    pub booking_id: String,
    pub guest_name: String,
    pub mobile: String,
    pub room_category: String,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub amount: i64,
}

/// Airbnb reservation. Carries a night count rather than an end date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirbnbReservation {
    pub confirmation_code: String,
    pub guest_name: String,
    pub phone: String,
    pub room_type: String,
    pub start_date: Option<NaiveDate>,
    pub nights: i64,
    pub payout_total: i64,
}

/// Expedia itinerary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpediaReservation {
    pub itinerary_id: String,
    pub given_name: String,
    pub surname: String,
    pub phone: String,
    pub room_type_name: String,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub total_charge: i64,
}

/// A payload from a channel without a dedicated extractor.
///
/// Only keys that already carry a canonical name are picked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownReservation {
    pub fields: NormalizedReservation,
}

/// A raw payload, lifted into the shape of the channel that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalReservation {
    BookingCom(BookingComReservation),
    Agoda(AgodaReservation),
    MakeMyTrip(MakeMyTripReservation),
    Airbnb(AirbnbReservation),
    Expedia(ExpediaReservation),
    Unknown(UnknownReservation),
}

impl ExternalReservation {
    /// Reads `raw` with the extractor for `platform`.
    pub fn lift(raw: &Value, platform: &OtaPlatform) -> Self {
        let f = Fields(raw);
        match platform {
            OtaPlatform::BookingCom => ExternalReservation::BookingCom(BookingComReservation {
                reservation_id: f.text(&["reservation_id"]),
                booker_first_name: f.text(&["booker", "first_name"]),
                booker_last_name: f.text(&["booker", "last_name"]),
                telephone: f.text(&["booker", "telephone"]),
                room_name: f.text(&["room", "name"]),
                arrival_date: f.date(&["arrival_date"]),
                departure_date: f.date(&["departure_date"]),
                total_price: f.amount(&["total_price", "amount"]),
            }),
            OtaPlatform::Agoda => ExternalReservation::Agoda(AgodaReservation {
                booking_id: f.text(&["BookingID"]),
                guest_name: f.text(&["GuestDetails", "Name"]),
                guest_phone: f.text(&["GuestDetails", "Phone"]),
                room_type: f.text(&["RoomType"]),
                check_in: f.date(&["CheckIn"]),
                check_out: f.date(&["CheckOut"]),
                total_amount: f.amount(&["TotalAmount"]),
            }),
            OtaPlatform::MakeMyTrip | OtaPlatform::Goibibo => {
                ExternalReservation::MakeMyTrip(MakeMyTripReservation {
                    booking_id: f.text(&["bookingId"]),
                    guest_name: f.text(&["guest", "name"]),
                    mobile: f.text(&["guest", "mobile"]),
                    room_category: f.text(&["roomCategory"]),
                    check_in_date: f.date(&["checkInDate"]),
                    check_out_date: f.date(&["checkOutDate"]),
                    amount: f.amount(&["amount", "total"]),
                })
            }
            OtaPlatform::Airbnb => ExternalReservation::Airbnb(AirbnbReservation {
                confirmation_code: f.text(&["confirmation_code"]),
                guest_name: f.text(&["guest", "full_name"]),
                phone: f.text(&["guest", "phone"]),
                room_type: f.text(&["listing", "room_type"]),
                start_date: f.date(&["start_date"]),
                nights: f.amount(&["nights"]),
                payout_total: f.amount(&["payout", "total"]),
            }),
            OtaPlatform::Expedia => ExternalReservation::Expedia(ExpediaReservation {
                itinerary_id: f.text(&["itineraryId"]),
                given_name: f.text(&["primaryGuest", "givenName"]),
                surname: f.text(&["primaryGuest", "surname"]),
                phone: f.text(&["primaryGuest", "phone"]),
                room_type_name: f.text(&["roomTypeName"]),
                check_in: f.date(&["stay", "checkIn"]),
                check_out: f.date(&["stay", "checkOut"]),
                total_charge: f.amount(&["totalCharge", "amount"]),
            }),
            OtaPlatform::Other(_) => ExternalReservation::Unknown(UnknownReservation {
                fields: NormalizedReservation {
                    external_id: f.first_text(&[&["external_id"], &["externalId"]]),
                    guest_name: f.first_text(&[&["guest_name"], &["guestName"]]),
                    phone: f.text(&["phone"]),
                    room_type: f.first_text(&[&["room_type"], &["roomType"]]),
                    check_in: f.date(&["check_in"]).or_else(|| f.date(&["checkIn"])),
                    check_out: f.date(&["check_out"]).or_else(|| f.date(&["checkOut"])),
                    price: f.amount(&["price"]),
                    source_platform: String::new(),
                },
            }),
        }
    }

    /// Collapses the channel shape into the canonical one.
    pub fn into_normalized(self, platform: &OtaPlatform) -> NormalizedReservation {
        let mut normalized = match self {
            ExternalReservation::BookingCom(r) => NormalizedReservation {
                external_id: r.reservation_id,
                guest_name: join_name(r.booker_first_name, r.booker_last_name),
                phone: r.telephone,
                room_type: r.room_name,
                check_in: r.arrival_date,
                check_out: r.departure_date,
                price: r.total_price,
                ..Default::default()
            },
            ExternalReservation::Agoda(r) => NormalizedReservation {
                external_id: r.booking_id,
                guest_name: r.guest_name,
                phone: r.guest_phone,
                room_type: r.room_type,
                check_in: r.check_in,
                check_out: r.check_out,
                price: r.total_amount,
                ..Default::default()
            },
            ExternalReservation::MakeMyTrip(r) => NormalizedReservation {
                external_id: r.booking_id,
                guest_name: r.guest_name,
                phone: r.mobile,
                room_type: r.room_category,
                check_in: r.check_in_date,
                check_out: r.check_out_date,
                price: r.amount,
                ..Default::default()
            },
            ExternalReservation::Airbnb(r) => {
                let check_out = match (r.start_date, u64::try_from(r.nights)) {
                    (Some(start), Ok(nights)) if nights > 0 => {
                        start.checked_add_days(Days::new(nights))
                    }
                    _ => None,
                };
                NormalizedReservation {
                    external_id: r.confirmation_code,
                    guest_name: r.guest_name,
                    phone: r.phone,
                    room_type: r.room_type,
                    check_in: r.start_date,
                    check_out,
                    price: r.payout_total,
                    ..Default::default()
                }
            }
            ExternalReservation::Expedia(r) => NormalizedReservation {
                external_id: r.itinerary_id,
                guest_name: join_name(r.given_name, r.surname),
                phone: r.phone,
                room_type: r.room_type_name,
                check_in: r.check_in,
                check_out: r.check_out,
                price: r.total_charge,
                ..Default::default()
            },
            ExternalReservation::Unknown(r) => r.fields,
        };
        normalized.source_platform = platform.name().to_string();
        normalized
    }
}

/// Normalizes one raw channel payload. Pure and total.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use swarna_core::ota::{normalize, OtaPlatform};
///
/// let raw = json!({
///     "BookingID": 771203,
///     "GuestDetails": { "Name": "Rahul Mehta", "Phone": "9811122233" },
///     "RoomType": "Deluxe Non AC Room",
///     "CheckIn": "2025-03-11",
///     "CheckOut": "2025-03-13",
///     "TotalAmount": "3900"
/// });
///
/// let r = normalize(&raw, &OtaPlatform::Agoda);
/// assert_eq!(r.external_id, "771203");
/// assert_eq!(r.price, 3900);
/// assert_eq!(r.source_platform, "Agoda");
/// ```
pub fn normalize(raw: &Value, platform: &OtaPlatform) -> NormalizedReservation {
    ExternalReservation::lift(raw, platform).into_normalized(platform)
}

// =============================================================================
// Import Planning
// =============================================================================

/// Why a reservation could not become a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RejectedReservation {
    pub external_id: String,
    pub source_platform: String,
    pub reason: String,
}

/// Outcome of matching a feed against the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    /// New bookings, in feed order, ready to insert.
    pub bookings: Vec<Booking>,
    /// External ids already present (in the store or earlier in this feed).
    pub duplicates: Vec<String>,
    pub rejected: Vec<RejectedReservation>,
}

impl ImportPlan {
    /// Reservations considered, whatever their outcome.
    pub fn considered(&self) -> usize {
        self.bookings.len() + self.duplicates.len() + self.rejected.len()
    }
}

fn arrival(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(OTA_ARRIVAL_HOUR, 0, 0)
}

/// Builds the booking for one reservation, or the reason it cannot be one.
pub fn booking_from_reservation(r: &NormalizedReservation) -> Result<Booking, String> {
    let external_id = r.external_id.trim();
    if external_id.is_empty() {
        return Err("missing reservation id".to_string());
    }
    let check_in_date = r.check_in.ok_or_else(|| "missing check-in date".to_string())?;
    if !(0..=MAX_AMOUNT).contains(&r.price) {
        return Err(format!("price {} is outside 0..={}", r.price, MAX_AMOUNT));
    }

    let nights = match r.check_out {
        Some(out) if out > check_in_date => (out - check_in_date).num_days().max(1),
        _ => 1,
    };

    let check_in = arrival(check_in_date).ok_or_else(|| "invalid check-in date".to_string())?;
    let check_out = u64::try_from(nights)
        .ok()
        .and_then(|n| check_in.checked_add_days(Days::new(n)))
        .ok_or_else(|| "check-out falls outside the supported calendar".to_string())?;

    let room_type = match r.room_type.trim() {
        "" => DEFAULT_ROOM_TYPE,
        t => t,
    };
    let name = match r.guest_name.trim() {
        "" => format!("{} Guest", r.source_platform),
        n => n.to_string(),
    };
    let price = Money::from_units(r.price);

    Ok(Booking {
        id: UNSAVED_BOOKING_ID,
        room: unassigned_room(room_type),
        name,
        mobile: r.phone.trim().to_string(),
        email: String::new(),
        id_type: IdType::Ota,
        id_number: external_id.to_string(),
        document_path: None,
        file_ext: None,
        check_in,
        check_out,
        days: nights,
        rent: price.per_night(nights).units(),
        advance: 0,
        total: price.units(),
        due: price.units(),
        commission: 0,
        ref_by: BookingSource::Ota(r.source_platform.clone()),
        payment_mode: PaymentMode::Transfer,
        payment_ref: external_id.to_string(),
        created_at: None,
    })
}

/// Decides, per reservation, whether to insert, skip as duplicate or reject.
///
/// A reservation is a duplicate when any stored booking's `payment_ref`
/// equals its external id, or when the same id appeared earlier in the feed.
/// Running the same feed twice therefore plans zero bookings the second time.
pub fn plan_ota_import(
    reservations: Vec<NormalizedReservation>,
    existing: &[Booking],
) -> ImportPlan {
    let mut seen: HashSet<String> = existing
        .iter()
        .map(|b| b.payment_ref.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    let mut plan = ImportPlan::default();
    for reservation in reservations {
        let external_id = reservation.external_id.trim().to_string();
        if !external_id.is_empty() && seen.contains(&external_id) {
            plan.duplicates.push(external_id);
            continue;
        }

        match booking_from_reservation(&reservation) {
            Ok(booking) => {
                seen.insert(external_id);
                plan.bookings.push(booking);
            }
            Err(reason) => plan.rejected.push(RejectedReservation {
                external_id,
                source_platform: reservation.source_platform,
                reason,
            }),
        }
    }
    plan
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn reservation(id: &str, check_in: NaiveDate, check_out: NaiveDate, price: i64) -> NormalizedReservation {
        NormalizedReservation {
            external_id: id.into(),
            guest_name: "Priya Nair".into(),
            phone: "9000012345".into(),
            room_type: "Deluxe".into(),
            check_in: Some(check_in),
            check_out: Some(check_out),
            price,
            source_platform: "Agoda".into(),
        }
    }

    #[test]
    fn test_booking_com_payload() {
        let raw = json!({
            "reservation_id": "BDC-48213",
            "booker": { "first_name": "Ananya", "last_name": "Iyer", "telephone": "+91 98450 11223" },
            "room": { "name": "Super Deluxe Room" },
            "arrival_date": "2025-03-10",
            "departure_date": "2025-03-12",
            "total_price": { "amount": "6400.00", "currency": "INR" }
        });

        let r = normalize(&raw, &OtaPlatform::BookingCom);
        assert_eq!(r.external_id, "BDC-48213");
        assert_eq!(r.guest_name, "Ananya Iyer");
        assert_eq!(r.room_type, "Super Deluxe Room");
        assert_eq!(r.check_in, Some(date(3, 10)));
        assert_eq!(r.check_out, Some(date(3, 12)));
        assert_eq!(r.price, 6400);
        assert_eq!(r.source_platform, "Booking.com");
    }

    #[test]
    fn test_makemytrip_dates_and_goibibo_share_shape() {
        let raw = json!({
            "bookingId": "MMT-5521",
            "guest": { "name": "Priya Nair", "mobile": "9000012345" },
            "roomCategory": "Swarna Family Suite",
            "checkInDate": "14-03-2025",
            "checkOutDate": "16-03-2025",
            "amount": { "total": 9800 }
        });

        let mmt = normalize(&raw, &OtaPlatform::MakeMyTrip);
        assert_eq!(mmt.check_in, Some(date(3, 14)));
        assert_eq!(mmt.check_out, Some(date(3, 16)));
        assert_eq!(mmt.price, 9800);

        let goibibo = normalize(&raw, &OtaPlatform::Goibibo);
        assert_eq!(goibibo.external_id, "MMT-5521");
        assert_eq!(goibibo.source_platform, "Goibibo");
    }

    #[test]
    fn test_airbnb_night_count_becomes_check_out() {
        let raw = json!({
            "confirmation_code": "HMX2Q8",
            "guest": { "full_name": "Tom Becker", "phone": "+49 151 000000" },
            "listing": { "room_type": "Swarna Family Suite" },
            "start_date": "2025-03-20",
            "nights": "3",
            "payout": { "total": 15000 }
        });

        let r = normalize(&raw, &OtaPlatform::Airbnb);
        assert_eq!(r.check_in, Some(date(3, 20)));
        assert_eq!(r.check_out, Some(date(3, 23)));
        assert_eq!(r.price, 15000);
    }

    #[test]
    fn test_expedia_timestamps_and_fractional_price() {
        let raw = json!({
            "itineraryId": 9931002,
            "primaryGuest": { "givenName": "Sara", "surname": "Khan", "phone": "9123400000" },
            "roomTypeName": "Deluxe Non AC Room",
            "stay": { "checkIn": "2025-03-21T14:00:00Z", "checkOut": "2025-03-23T11:00:00Z" },
            "totalCharge": { "amount": 4100.5 }
        });

        let r = normalize(&raw, &OtaPlatform::Expedia);
        assert_eq!(r.external_id, "9931002");
        assert_eq!(r.guest_name, "Sara Khan");
        assert_eq!(r.check_in, Some(date(3, 21)));
        assert_eq!(r.price, 4101);
    }

    #[test]
    fn test_unknown_platform_picks_up_canonical_keys() {
        let raw = json!({
            "external_id": "HW-1",
            "guestName": "Lena",
            "check_in": "2025-04-01",
            "price": "2500",
            "loyalty_tier": "gold"
        });

        let platform = OtaPlatform::parse("Hostelworld");
        let r = normalize(&raw, &platform);
        assert_eq!(r.external_id, "HW-1");
        assert_eq!(r.guest_name, "Lena");
        assert_eq!(r.check_in, Some(date(4, 1)));
        assert_eq!(r.check_out, None);
        assert_eq!(r.price, 2500);
        assert_eq!(r.source_platform, "Hostelworld");
    }

    #[test]
    fn test_malformed_payloads_yield_defaults() {
        for raw in [json!(null), json!([1, 2]), json!("text"), json!({ "TotalAmount": { "x": 1 } })] {
            let r = normalize(&raw, &OtaPlatform::Agoda);
            assert_eq!(r.external_id, "");
            assert_eq!(r.price, 0);
            assert_eq!(r.check_in, None);
            assert_eq!(r.source_platform, "Agoda");
        }
    }

    #[test]
    fn test_platform_names_round_trip() {
        for platform in OtaPlatform::KNOWN {
            assert_eq!(OtaPlatform::parse(platform.name()), platform);
        }
        let json = serde_json::to_value(OtaPlatform::BookingCom).unwrap();
        assert_eq!(json, "Booking.com");
    }

    #[test]
    fn test_reservation_becomes_unassigned_ota_booking() {
        let b = booking_from_reservation(&reservation("AG-1", date(3, 1), date(3, 3), 5001)).unwrap();

        assert_eq!(b.room, "Unassigned (Deluxe)");
        assert_eq!(b.ref_by.to_ref_by(), "OTA - Agoda");
        assert_eq!(b.days, 2);
        assert_eq!(b.rent, 2501);
        assert_eq!(b.total, 5001);
        assert_eq!(b.due, 5001);
        assert_eq!(b.advance, 0);
        assert_eq!(b.payment_ref, "AG-1");
        assert_eq!(b.id_number, "AG-1");
        assert_eq!(b.id_type, IdType::Ota);
        assert_eq!(b.check_in, date(3, 1).and_hms_opt(12, 0, 0).unwrap());
        assert_eq!(b.check_out, date(3, 3).and_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn test_missing_or_inverted_check_out_is_one_night() {
        let mut r = reservation("AG-2", date(3, 5), date(3, 5), 1800);
        r.room_type = String::new();
        r.check_out = None;

        let b = booking_from_reservation(&r).unwrap();
        assert_eq!(b.days, 1);
        assert_eq!(b.room, "Unassigned (Standard)");
        assert!(b.check_out > b.check_in);

        r.check_out = Some(date(3, 1));
        assert_eq!(booking_from_reservation(&r).unwrap().days, 1);
    }

    #[test]
    fn test_plan_skips_stored_and_repeated_ids() {
        let feed = vec![
            reservation("AG-1", date(3, 1), date(3, 3), 4000),
            reservation("AG-2", date(3, 2), date(3, 4), 4000),
            reservation("AG-2", date(3, 2), date(3, 4), 4000),
        ];

        let first = plan_ota_import(feed.clone(), &[]);
        assert_eq!(first.bookings.len(), 2);
        assert_eq!(first.duplicates, vec!["AG-2".to_string()]);

        // Second run against what the first one stored inserts nothing.
        let second = plan_ota_import(feed, &first.bookings);
        assert!(second.bookings.is_empty());
        assert_eq!(second.duplicates.len(), 3);
        assert_eq!(second.considered(), 3);
    }

    #[test]
    fn test_plan_rejects_unusable_reservations() {
        let mut no_id = reservation("", date(3, 1), date(3, 2), 1000);
        no_id.guest_name = "Nobody".into();
        let mut no_date = reservation("AG-9", date(3, 1), date(3, 2), 1000);
        no_date.check_in = None;

        let plan = plan_ota_import(vec![no_id, no_date], &[]);
        assert!(plan.bookings.is_empty());
        assert_eq!(plan.rejected.len(), 2);
        assert_eq!(plan.rejected[1].external_id, "AG-9");
        assert_eq!(plan.rejected[1].reason, "missing check-in date");
    }

    #[test]
    fn test_plan_rejects_out_of_range_prices() {
        let feed = vec![
            reservation("AG-9", date(3, 1), date(3, 3), i64::MAX),
            reservation("AG-10", date(3, 1), date(3, 3), -500),
            reservation("AG-11", date(3, 1), date(3, 3), MAX_AMOUNT),
        ];

        let plan = plan_ota_import(feed, &[]);
        assert_eq!(plan.bookings.len(), 1);
        assert_eq!(plan.bookings[0].payment_ref, "AG-11");
        assert_eq!(plan.bookings[0].rent, MAX_AMOUNT / 2);
        let rejected: Vec<&str> = plan.rejected.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(rejected, ["AG-9", "AG-10"]);
        assert!(plan.rejected[0].reason.starts_with("price"));
    }

    #[test]
    fn test_saturated_string_price_is_rejected() {
        let raw = json!({
            "external_id": "HW-2",
            "check_in": "2025-03-01",
            "price": "1e300"
        });
        let r = normalize(&raw, &OtaPlatform::parse("Hostelworld"));
        assert_eq!(r.price, i64::MAX);
        assert!(booking_from_reservation(&r).is_err());
    }
}
