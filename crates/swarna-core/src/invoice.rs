//! # Invoice
//!
//! The data an invoice shows and the email that carries it.
//! Rendering to PDF belongs to the UI shell.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Booking;

/// One charge line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub description: String,
    #[ts(as = "i64")]
    pub amount: Money,
}

/// Invoice for one booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// `Invoice_<id>`.
    pub number: String,
    pub hotel_name: String,
    pub booking_id: i64,

    pub guest_name: String,
    pub guest_email: String,
    pub room: String,
    #[ts(as = "String")]
    pub check_in: NaiveDateTime,
    #[ts(as = "String")]
    pub check_out: NaiveDateTime,

    pub lines: Vec<InvoiceLine>,
    #[ts(as = "i64")]
    pub subtotal: Money,
    #[ts(as = "i64")]
    pub advance: Money,
    #[ts(as = "i64")]
    pub due: Money,

    pub payment_mode: String,
    pub payment_ref: String,
}

impl Invoice {
    pub fn for_booking(booking: &Booking, hotel_name: &str) -> Self {
        let nights = if booking.days == 1 { "night" } else { "nights" };
        Invoice {
            number: format!("Invoice_{}", booking.id),
            hotel_name: hotel_name.to_string(),
            booking_id: booking.id,
            guest_name: booking.name.clone(),
            guest_email: booking.email.clone(),
            room: booking.room.clone(),
            check_in: booking.check_in,
            check_out: booking.check_out,
            lines: vec![InvoiceLine {
                description: format!(
                    "Room charges ({} {} × {})",
                    booking.days,
                    nights,
                    Money::from_units(booking.rent)
                ),
                amount: booking.total(),
            }],
            subtotal: booking.total(),
            advance: Money::from_units(booking.advance),
            due: booking.balance(),
            payment_mode: booking.payment_mode.to_string(),
            payment_ref: booking.payment_ref.clone(),
        }
    }

    /// Email subject line.
    pub fn email_subject(&self) -> String {
        format!("Invoice - {} Room {}", self.hotel_name, self.room)
    }

    /// Email body, addressed to the guest.
    pub fn email_body(&self) -> String {
        format!(
            "Dear {},\n\nPlease find attached invoice.\n\n{}",
            self.guest_name, self.hotel_name
        )
    }

    /// Attachment name for the emailed PDF.
    pub fn attachment_name(&self) -> String {
        format!("{}.pdf", self.number)
    }

    /// File name offered when the desk downloads the PDF.
    pub fn download_name(&self) -> String {
        let name: String = self
            .guest_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        format!("invoice_{}_{}.pdf", self.room, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BookingSource, IdType, PaymentMode};
    use chrono::NaiveDate;

    fn booking() -> Booking {
        let at = |d| {
            NaiveDate::from_ymd_opt(2025, 3, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        };
        Booking {
            id: 42,
            room: "101".into(),
            name: "Asha  Rao".into(),
            mobile: "9800000001".into(),
            email: "asha@example.com".into(),
            id_type: IdType::Aadhar,
            id_number: "1234".into(),
            document_path: None,
            file_ext: None,
            check_in: at(1),
            check_out: at(3),
            days: 2,
            rent: 3000,
            advance: 2000,
            total: 6000,
            due: 4000,
            commission: 0,
            ref_by: BookingSource::WalkIn,
            payment_mode: PaymentMode::Upi,
            payment_ref: "UPI-889".into(),
            created_at: None,
        }
    }

    #[test]
    fn test_invoice_figures() {
        let invoice = Invoice::for_booking(&booking(), "Swarna Villa");
        assert_eq!(invoice.number, "Invoice_42");
        assert_eq!(invoice.subtotal.units(), 6000);
        assert_eq!(invoice.advance.units(), 2000);
        assert_eq!(invoice.due.units(), 4000);
        assert_eq!(invoice.lines[0].description, "Room charges (2 nights × ₹3000)");
        assert_eq!(invoice.payment_mode, "UPI");
    }

    #[test]
    fn test_email_fields() {
        let invoice = Invoice::for_booking(&booking(), "Swarna Villa");
        assert_eq!(invoice.email_subject(), "Invoice - Swarna Villa Room 101");
        assert_eq!(
            invoice.email_body(),
            "Dear Asha  Rao,\n\nPlease find attached invoice.\n\nSwarna Villa"
        );
        assert_eq!(invoice.attachment_name(), "Invoice_42.pdf");
        assert_eq!(invoice.download_name(), "invoice_101_Asha_Rao.pdf");
    }
}
