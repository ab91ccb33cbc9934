//! # Booking Search
//!
//! Filtering and paging for the booking table.
//!
//! The table searches three columns with one box: the guest name
//! (case-insensitive), the mobile number and the room (plain substring).
//! Results keep the store order, newest first, and are cut into pages of
//! [`BOOKINGS_PAGE_SIZE`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Booking;
use crate::BOOKINGS_PAGE_SIZE;

/// What the booking table asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingFilter {
    pub search: String,
    /// 1-based.
    pub page: usize,
}

impl Default for BookingFilter {
    fn default() -> Self {
        BookingFilter {
            search: String::new(),
            page: 1,
        }
    }
}

/// One page of the booking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    /// The page actually returned, after clamping.
    pub page: usize,
    /// At least 1, even when nothing matched.
    pub total_pages: usize,
    pub total_matches: usize,
}

/// True when `booking` matches the search box.
///
/// An empty (or all-blank) query matches everything.
pub fn matches_search(booking: &Booking, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    booking.name.to_lowercase().contains(&query.to_lowercase())
        || booking.mobile.contains(query)
        || booking.room.contains(query)
}

/// Filters `bookings` and returns the requested page.
///
/// Out-of-range pages are clamped to the nearest valid one.
///
/// ```rust
/// use swarna_core::search::{page_bookings, BookingFilter};
///
/// let page = page_bookings(Vec::new(), &BookingFilter::default());
/// assert_eq!(page.total_pages, 1);
/// assert!(page.bookings.is_empty());
/// ```
pub fn page_bookings(bookings: Vec<Booking>, filter: &BookingFilter) -> BookingPage {
    let matched: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| matches_search(b, &filter.search))
        .collect();

    let total_matches = matched.len();
    let total_pages = total_matches.div_ceil(BOOKINGS_PAGE_SIZE).max(1);
    let page = filter.page.clamp(1, total_pages);

    let bookings = matched
        .into_iter()
        .skip((page - 1) * BOOKINGS_PAGE_SIZE)
        .take(BOOKINGS_PAGE_SIZE)
        .collect();

    BookingPage {
        bookings,
        page,
        total_pages,
        total_matches,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookingSource, IdType, PaymentMode};
    use chrono::NaiveDate;

    fn booking(id: i64, room: &str, name: &str, mobile: &str) -> Booking {
        let check_in = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Booking {
            id,
            room: room.into(),
            name: name.into(),
            mobile: mobile.into(),
            email: String::new(),
            id_type: IdType::Aadhar,
            id_number: String::new(),
            document_path: None,
            file_ext: None,
            check_in,
            check_out: check_in + chrono::Duration::days(1),
            days: 1,
            rent: 3000,
            advance: 0,
            total: 3000,
            due: 3000,
            commission: 0,
            ref_by: BookingSource::WalkIn,
            payment_mode: PaymentMode::Cash,
            payment_ref: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_search_columns() {
        let b = booking(1, "201", "Asha Rao", "9800012345");
        assert!(matches_search(&b, "asha"));
        assert!(matches_search(&b, "RAO"));
        assert!(matches_search(&b, "12345"));
        assert!(matches_search(&b, "201"));
        assert!(matches_search(&b, "  "));
        assert!(!matches_search(&b, "Vikram"));
    }

    #[test]
    fn test_paging_and_clamping() {
        let all: Vec<Booking> = (1..=23)
            .rev()
            .map(|id| booking(id, "101", &format!("Guest {id}"), "98000"))
            .collect();

        let first = page_bookings(all.clone(), &BookingFilter::default());
        assert_eq!(first.total_matches, 23);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.bookings.len(), 10);
        assert_eq!(first.bookings[0].id, 23);

        let last = page_bookings(
            all.clone(),
            &BookingFilter {
                search: String::new(),
                page: 99,
            },
        );
        assert_eq!(last.page, 3);
        assert_eq!(last.bookings.len(), 3);

        let none = page_bookings(
            all,
            &BookingFilter {
                search: "nobody".into(),
                page: 0,
            },
        );
        assert_eq!(none.page, 1);
        assert_eq!(none.total_pages, 1);
        assert_eq!(none.total_matches, 0);
    }
}
