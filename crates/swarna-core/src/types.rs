//! # Domain Types
//!
//! Core domain types used throughout the front desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    RoomRate     │   │     Booking     │   │  LedgerEntry    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  room_no (key)  │   │  id (store)     │   │  raw text of    │       │
//! │  │  room_type      │──►│  room, stay     │──►│  refBy, room,   │       │
//! │  │  rate           │   │  billing        │   │  checkIn, days, │       │
//! │  └─────────────────┘   │  ref_by         │   │  total, due ... │       │
//! │     rent is copied     └─────────────────┘   └─────────────────┘       │
//! │     at booking time                            read by reports         │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  BookingSource  │   │     IdType      │   │   PaymentMode   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  WalkIn         │   │  Aadhar, PAN    │   │  Cash, UPI      │       │
//! │  │  Agent(name)    │   │  Passport, DL   │   │  Card, Transfer │       │
//! │  │  Ota(platform)  │   │  OTA            │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Legacy Strings
//! The enums above round-trip through the exact strings the desk has always
//! stored (`"Walk-in"`, `"Agent - Ravi"`, `"Driving License"` ...). Values that
//! match no known shape are preserved verbatim in an `Other` variant instead of
//! failing the whole read.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Stay Timestamps
// =============================================================================

/// Canonical storage format for check-in/check-out.
///
/// Lexicographic order of this format matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats a stay timestamp for storage.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stay timestamp leniently.
///
/// Accepts what the desk UI and older databases have produced over time:
/// - `2025-03-01T12:00:00` / `2025-03-01T12:00` (datetime-local input)
/// - `2025-03-01 12:00:00` (SQLite `CURRENT_TIMESTAMP`)
/// - RFC 3339 with an offset (wall-clock time is kept)
/// - `2025-03-01` (midnight)
///
/// Returns `None` rather than an error so callers decide how strict to be.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    for format in FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at);
        }
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_local());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// =============================================================================
// Lenient Numbers
// =============================================================================

/// Reads the leading number of a string, or 0.
///
/// Mirrors how the desk has always read numeric columns: `"6000"` → 6000,
/// `" 12.5 nights"` → 12.5, `"abc"` / `""` → 0. Never fails.
pub fn parse_lenient_number(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    // Optional exponent, only when digits follow it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// [`parse_lenient_number`] rounded to whole currency units.
pub fn parse_lenient_amount(raw: &str) -> i64 {
    parse_lenient_number(raw).round() as i64
}

// =============================================================================
// Room Rate
// =============================================================================

/// A room in the rate catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomRate {
    /// Room number, the unique key (e.g. "101").
    pub room_no: String,

    /// Display name of the room category (e.g. "Super Deluxe Room").
    pub room_type: String,

    /// Nightly rate in whole currency units.
    pub rate: i64,
}

impl RoomRate {
    /// Returns the nightly rate as Money.
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_units(self.rate)
    }
}

// =============================================================================
// Unassigned Rooms
// =============================================================================

const UNASSIGNED_PREFIX: &str = "Unassigned (";

/// Builds the placeholder room for an OTA booking not yet routed to a room.
///
/// ```rust
/// use swarna_core::types::unassigned_room;
/// assert_eq!(unassigned_room("Deluxe"), "Unassigned (Deluxe)");
/// ```
pub fn unassigned_room(room_type: &str) -> String {
    format!("{UNASSIGNED_PREFIX}{room_type})")
}

/// Returns the room type wrapped by an "Unassigned (...)" placeholder.
pub fn unassigned_room_type(room: &str) -> Option<&str> {
    room.strip_prefix(UNASSIGNED_PREFIX)?.strip_suffix(')')
}

/// True for placeholder rooms, which are never conflict-checked.
pub fn is_unassigned_room(room: &str) -> bool {
    room.starts_with(UNASSIGNED_PREFIX)
}

// =============================================================================
// Booking Source
// =============================================================================

/// How a booking reached the hotel.
///
/// Stored and sent to the UI as the legacy `refBy` string:
///
/// | Variant            | String              |
/// |--------------------|---------------------|
/// | `WalkIn`           | `Walk-in`           |
/// | `Agent("Ravi")`    | `Agent - Ravi`      |
/// | `Ota("Agoda")`     | `OTA - Agoda`       |
/// | `Other(raw)`       | `raw` unchanged     |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingSource {
    WalkIn,
    Agent(String),
    Ota(String),
    /// A stored value matching none of the shapes above.
    Other(String),
}

impl BookingSource {
    const WALK_IN: &'static str = "Walk-in";
    const AGENT_PREFIX: &'static str = "Agent - ";
    const OTA_PREFIX: &'static str = "OTA - ";

    /// Parses a stored `refBy` value. Never fails.
    pub fn parse(raw: &str) -> Self {
        if raw == Self::WALK_IN {
            BookingSource::WalkIn
        } else if let Some(name) = raw.strip_prefix(Self::AGENT_PREFIX) {
            BookingSource::Agent(name.to_string())
        } else if let Some(platform) = raw.strip_prefix(Self::OTA_PREFIX) {
            BookingSource::Ota(platform.to_string())
        } else {
            BookingSource::Other(raw.to_string())
        }
    }

    /// Returns the canonical `refBy` string.
    pub fn to_ref_by(&self) -> String {
        match self {
            BookingSource::WalkIn => Self::WALK_IN.to_string(),
            BookingSource::Agent(name) => format!("{}{}", Self::AGENT_PREFIX, name),
            BookingSource::Ota(platform) => format!("{}{}", Self::OTA_PREFIX, platform),
            BookingSource::Other(raw) => raw.clone(),
        }
    }

    #[inline]
    pub fn is_ota(&self) -> bool {
        matches!(self, BookingSource::Ota(_))
    }
}

impl Default for BookingSource {
    fn default() -> Self {
        BookingSource::WalkIn
    }
}

impl fmt::Display for BookingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ref_by())
    }
}

impl From<String> for BookingSource {
    fn from(raw: String) -> Self {
        BookingSource::parse(&raw)
    }
}

impl From<BookingSource> for String {
    fn from(source: BookingSource) -> Self {
        source.to_ref_by()
    }
}

/// The source picker on the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SourceKind {
    #[default]
    #[serde(rename = "Walk-in")]
    WalkIn,
    #[serde(rename = "Agent")]
    Agent,
    #[serde(rename = "OTA")]
    Ota,
}

/// Source type plus the free-text agent/platform name typed next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SourceSelection {
    pub kind: SourceKind,
    #[serde(default)]
    pub name: String,
}

impl SourceSelection {
    pub fn walk_in() -> Self {
        SourceSelection::default()
    }

    pub fn agent(name: impl Into<String>) -> Self {
        SourceSelection {
            kind: SourceKind::Agent,
            name: name.into(),
        }
    }

    pub fn ota(platform: impl Into<String>) -> Self {
        SourceSelection {
            kind: SourceKind::Ota,
            name: platform.into(),
        }
    }

    /// Canonical source for this selection.
    ///
    /// The name is trimmed but an empty name is kept, so an OTA booking with
    /// no platform typed becomes `"OTA - "`, its own "unspecified" bucket.
    pub fn to_source(&self) -> BookingSource {
        let name = self.name.trim().to_string();
        match self.kind {
            SourceKind::WalkIn => BookingSource::WalkIn,
            SourceKind::Agent => BookingSource::Agent(name),
            SourceKind::Ota => BookingSource::Ota(name),
        }
    }
}

// =============================================================================
// Identity Document Type
// =============================================================================

/// Guest identity document type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdType {
    Aadhar,
    Pan,
    Passport,
    DrivingLicense,
    /// OTA bookings carry the channel's reservation id instead of a document.
    Ota,
    Other(String),
}

impl IdType {
    pub fn as_str(&self) -> &str {
        match self {
            IdType::Aadhar => "Aadhar",
            IdType::Pan => "PAN",
            IdType::Passport => "Passport",
            IdType::DrivingLicense => "Driving License",
            IdType::Ota => "OTA",
            IdType::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "Aadhar" => IdType::Aadhar,
            "PAN" => IdType::Pan,
            "Passport" => IdType::Passport,
            "Driving License" => IdType::DrivingLicense,
            "OTA" => IdType::Ota,
            other => IdType::Other(other.to_string()),
        }
    }
}

impl Default for IdType {
    fn default() -> Self {
        IdType::Aadhar
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for IdType {
    fn from(raw: String) -> Self {
        IdType::parse(&raw)
    }
}

impl From<IdType> for String {
    fn from(id_type: IdType) -> Self {
        id_type.as_str().to_string()
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How the advance (or the OTA payout) was paid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMode {
    Cash,
    Upi,
    Card,
    Transfer,
    Other(String),
}

impl PaymentMode {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Upi => "UPI",
            PaymentMode::Card => "Card",
            PaymentMode::Transfer => "Transfer",
            PaymentMode::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "Cash" => PaymentMode::Cash,
            "UPI" => PaymentMode::Upi,
            "Card" => PaymentMode::Card,
            "Transfer" => PaymentMode::Transfer,
            other => PaymentMode::Other(other.to_string()),
        }
    }
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PaymentMode {
    fn from(raw: String) -> Self {
        PaymentMode::parse(&raw)
    }
}

impl From<PaymentMode> for String {
    fn from(mode: PaymentMode) -> Self {
        mode.as_str().to_string()
    }
}

// =============================================================================
// Booking
// =============================================================================

/// Id carried by a booking that has not been inserted yet.
pub const UNSAVED_BOOKING_ID: i64 = 0;

/// One guest stay.
///
/// Field names on the wire match the columns the desk has always used
/// (`checkIn`, `refBy`, `fileBase64` ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Store-assigned id; [`UNSAVED_BOOKING_ID`] before insert.
    pub id: i64,

    /// Room number, or an "Unassigned (Type)" placeholder.
    pub room: String,

    pub name: String,
    pub mobile: String,
    pub email: String,

    #[ts(as = "String")]
    pub id_type: IdType,
    pub id_number: String,

    /// Resolved path of the stored identity scan.
    #[serde(rename = "fileBase64")]
    pub document_path: Option<String>,
    pub file_ext: Option<String>,

    #[ts(as = "String")]
    pub check_in: NaiveDateTime,
    #[ts(as = "String")]
    pub check_out: NaiveDateTime,

    /// Nights, at least 1.
    pub days: i64,

    /// Nightly rate snapshot taken when the booking was saved.
    pub rent: i64,
    pub advance: i64,
    pub total: i64,
    pub due: i64,
    pub commission: i64,

    #[ts(as = "String")]
    pub ref_by: BookingSource,

    #[ts(as = "String")]
    pub payment_mode: PaymentMode,

    /// Free-text payment reference; the channel reservation id for OTA rows.
    pub payment_ref: String,

    #[ts(as = "Option<String>")]
    pub created_at: Option<NaiveDateTime>,
}

impl Booking {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_units(self.total)
    }

    /// Outstanding balance (`total − advance`).
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_units(self.due)
    }

    /// True when the advance exceeds the total.
    #[inline]
    pub fn is_overpaid(&self) -> bool {
        self.due < 0
    }

    #[inline]
    pub fn is_unassigned(&self) -> bool {
        is_unassigned_room(&self.room)
    }

    #[inline]
    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_BOOKING_ID
    }
}

// =============================================================================
// Ledger Entry
// =============================================================================

/// Raw text of the columns the reports read.
///
/// Rows imported from older installs may hold anything in numeric columns;
/// keeping the text lets the aggregator apply its own lenient parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub ref_by: String,
    pub room: String,
    pub check_in: String,
    pub days: String,
    pub total: String,
    pub due: String,
    pub commission: String,
}

impl From<&Booking> for LedgerEntry {
    fn from(b: &Booking) -> Self {
        LedgerEntry {
            ref_by: b.ref_by.to_ref_by(),
            room: b.room.clone(),
            check_in: format_timestamp(&b.check_in),
            days: b.days.to_string(),
            total: b.total.to_string(),
            due: b.due.to_string(),
            commission: b.commission.to_string(),
        }
    }
}

// =============================================================================
// Guest Profile
// =============================================================================

/// Identity details copied from a returning guest's last stay.
///
/// The booking form looks this up when a known mobile number is entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GuestProfile {
    pub name: String,
    pub email: String,
    #[ts(as = "String")]
    pub id_type: IdType,
    pub id_number: String,
    #[serde(rename = "fileBase64")]
    pub document_path: Option<String>,
    pub file_ext: Option<String>,
}

impl From<&Booking> for GuestProfile {
    fn from(b: &Booking) -> Self {
        GuestProfile {
            name: b.name.clone(),
            email: b.email.clone(),
            id_type: b.id_type.clone(),
            id_number: b.id_number.clone(),
            document_path: b.document_path.clone(),
            file_ext: b.file_ext.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
