//! # Reservation Feeds
//!
//! The collaborator that talks to a booking channel. A feed hands back the
//! channel's payloads untouched; turning them into bookings is the engine's
//! job.
//!
//! ```text
//!   OtaSyncEngine ──► ReservationFeed::fetch_raw_reservations(channel)
//!                            │
//!                            ├── SimulatedFeed   (canned payloads per channel)
//!                            └── <real client>   (HTTP, not part of this crate)
//! ```

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde_json::{json, Value};
use tracing::debug;

use swarna_core::ota::OtaPlatform;

use crate::config::ChannelConfig;
use crate::error::{SyncError, SyncResult};

/// Source of raw reservation payloads for one channel at a time.
#[async_trait]
pub trait ReservationFeed: Send + Sync {
    /// Every reservation the channel currently reports for this property.
    async fn fetch_raw_reservations(&self, channel: &ChannelConfig) -> SyncResult<Vec<Value>>;
}

// =============================================================================
// Simulated Feed
// =============================================================================

/// A feed that answers every channel with a fixed set of reservations.
///
/// Reservation ids never change, so repeated syncs exercise the duplicate
/// check. Stay dates are laid out from `anchor`.
#[derive(Debug, Clone)]
pub struct SimulatedFeed {
    anchor: NaiveDate,
}

impl SimulatedFeed {
    pub fn new(anchor: NaiveDate) -> Self {
        SimulatedFeed { anchor }
    }

    fn day(&self, offset: u64) -> String {
        self.anchor
            .checked_add_days(Days::new(offset))
            .unwrap_or(self.anchor)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// The canned payloads for one platform, in that platform's own shape.
    pub fn payloads_for(&self, platform: &OtaPlatform) -> Vec<Value> {
        match platform {
            OtaPlatform::BookingCom => vec![
                json!({
                    "reservation_id": "4021937710",
                    "booker": { "first_name": "Elena", "last_name": "Rossi", "telephone": "+39 333 120 4411" },
                    "room": { "name": "Super Deluxe Room" },
                    "arrival_date": self.day(2),
                    "departure_date": self.day(4),
                    "total_price": { "amount": "6400.00", "currency": "INR" }
                }),
                json!({
                    "reservation_id": "4021938025",
                    "booker": { "first_name": "Karan", "last_name": "Malhotra", "telephone": "9810012345" },
                    "room": { "name": "Swarna Family Suite" },
                    "arrival_date": self.day(9),
                    "departure_date": self.day(12),
                    "total_price": { "amount": 14250 }
                }),
            ],
            OtaPlatform::Agoda => vec![json!({
                "BookingID": 771203,
                "GuestDetails": { "Name": "Rahul Mehta", "Phone": "9811122233" },
                "RoomType": "Deluxe Non AC Room",
                "CheckIn": self.day(5),
                "CheckOut": self.day(7),
                "TotalAmount": "3900"
            })],
            OtaPlatform::MakeMyTrip => vec![json!({
                "bookingId": "NH7012638114",
                "guest": { "name": "Sneha Kulkarni", "mobile": "9822011223" },
                "roomCategory": "Deluxe Non AC Room",
                "checkInDate": self.day(1),
                "checkOutDate": self.day(2),
                "amount": { "total": 2100 }
            })],
            OtaPlatform::Goibibo => vec![json!({
                "bookingId": "GOI0093381",
                "guest": { "name": "Farhan Ali", "mobile": "9900112233" },
                "roomCategory": "",
                "checkInDate": self.day(3),
                "checkOutDate": self.day(5),
                "amount": { "total": "4000" }
            })],
            OtaPlatform::Airbnb => vec![json!({
                "confirmation_code": "HMXK4Q2Z9A",
                "guest": { "full_name": "Jonas Weber", "phone": "+49 151 2233 4455" },
                "listing": { "room_type": "Swarna Family Suite" },
                "start_date": self.day(14),
                "nights": 4,
                "payout": { "total": 19800 }
            })],
            OtaPlatform::Expedia => vec![json!({
                "itineraryId": "72318820041",
                "primaryGuest": { "givenName": "Maya", "surname": "Thompson", "phone": "+1 415 555 0142" },
                "roomTypeName": "Super Deluxe Room",
                "stay": { "checkIn": self.day(6), "checkOut": self.day(8) },
                "totalCharge": { "amount": 6150.5 }
            })],
            OtaPlatform::Other(_) => Vec::new(),
        }
    }
}

#[async_trait]
impl ReservationFeed for SimulatedFeed {
    async fn fetch_raw_reservations(&self, channel: &ChannelConfig) -> SyncResult<Vec<Value>> {
        let payloads = self.payloads_for(&channel.platform);
        debug!(platform = %channel.platform, count = payloads.len(), "Simulated channel answered");
        Ok(payloads)
    }
}

/// A feed whose every fetch fails.
#[derive(Debug, Clone, Default)]
pub struct UnreachableFeed;

#[async_trait]
impl ReservationFeed for UnreachableFeed {
    async fn fetch_raw_reservations(&self, channel: &ChannelConfig) -> SyncResult<Vec<Value>> {
        Err(SyncError::fetch(channel.platform.name(), "channel unreachable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarna_core::ota::{normalize, plan_ota_import};

    fn feed() -> SimulatedFeed {
        SimulatedFeed::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    #[test]
    fn test_every_known_channel_normalizes_cleanly() {
        let feed = feed();
        let mut reservations = Vec::new();
        for platform in OtaPlatform::KNOWN.iter() {
            for raw in feed.payloads_for(platform) {
                reservations.push(normalize(&raw, platform));
            }
        }

        assert_eq!(reservations.len(), 7);
        let plan = plan_ota_import(reservations, &[]);
        assert_eq!(plan.bookings.len(), 7);
        assert!(plan.rejected.is_empty());
        assert!(plan.duplicates.is_empty());
    }

    #[test]
    fn test_airbnb_nights_become_check_out() {
        let raw = &feed().payloads_for(&OtaPlatform::Airbnb)[0];
        let r = normalize(raw, &OtaPlatform::Airbnb);
        assert_eq!(r.check_in, NaiveDate::from_ymd_opt(2025, 3, 15));
        assert_eq!(r.check_out, NaiveDate::from_ymd_opt(2025, 3, 19));
    }

    #[tokio::test]
    async fn test_feeds() {
        let agoda = ChannelConfig::new(OtaPlatform::Agoda);
        assert_eq!(feed().fetch_raw_reservations(&agoda).await.unwrap().len(), 1);

        let other = ChannelConfig::new(OtaPlatform::parse("Hostelworld"));
        assert!(feed().fetch_raw_reservations(&other).await.unwrap().is_empty());

        let err = UnreachableFeed.fetch_raw_reservations(&agoda).await.unwrap_err();
        assert!(matches!(err, SyncError::FetchFailed { ref platform, .. } if platform == "Agoda"));
    }
}
