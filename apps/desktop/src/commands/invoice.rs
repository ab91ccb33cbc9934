//! # Invoice Commands
//!
//! Invoice data for the printable view, and emailing the rendered PDF.
//!
//! ## Email Flow
//! ```text
//! Desk renders PDF ──► email_invoice(id, pdfBase64)
//!                          │
//!                          ├── guest has no email ──► DELIVERY_ERROR
//!                          │
//!                          ▼
//!                      InvoiceMailer::send_invoice  (email_timeout_secs)
//!                          │
//!                          ├── Ok ──► sent
//!                          └── Err / timeout ──► DELIVERY_ERROR, booking untouched
//! ```

use tracing::{info, warn};

use crate::documents::decode_base64;
use crate::error::ApiError;
use crate::mailer::{DeliveryError, InvoiceMailer, OutgoingInvoice};
use crate::state::{ConfigState, DbState};
use swarna_core::invoice::Invoice;

pub async fn get_invoice(
    db: &DbState,
    config: &ConfigState,
    booking_id: i64,
) -> Result<Invoice, ApiError> {
    let booking = db
        .inner()
        .bookings()
        .get_by_id(booking_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking", &booking_id.to_string()))?;

    Ok(Invoice::for_booking(&booking, &config.get().hotel_name))
}

/// Emails the rendered invoice PDF to the guest.
pub async fn email_invoice(
    db: &DbState,
    config: &ConfigState,
    mailer: &dyn InvoiceMailer,
    booking_id: i64,
    pdf_base64: String,
) -> Result<(), ApiError> {
    let invoice = get_invoice(db, config, booking_id).await?;
    if invoice.guest_email.trim().is_empty() {
        return Err(DeliveryError::MissingRecipient.into());
    }

    let outgoing = OutgoingInvoice {
        to: invoice.guest_email.trim().to_string(),
        subject: invoice.email_subject(),
        body: invoice.email_body(),
        attachment_name: invoice.attachment_name(),
        attachment: decode_base64(&pdf_base64)?,
    };

    let timeout = config.get().email_timeout();
    match tokio::time::timeout(timeout, mailer.send_invoice(outgoing)).await {
        Ok(Ok(())) => {
            info!(booking_id, number = %invoice.number, "Invoice emailed");
            Ok(())
        }
        Ok(Err(e)) => {
            warn!(booking_id, error = %e, "Invoice email failed");
            Err(e.into())
        }
        Err(_) => {
            warn!(booking_id, secs = timeout.as_secs(), "Invoice email timed out");
            Err(DeliveryError::Timeout(timeout.as_secs()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::booking::{save_booking, SaveOutcome};
    use crate::documents::DocumentStore;
    use crate::error::ErrorCode;
    use crate::mailer::DisabledMailer;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use std::time::Duration;
    use swarna_core::booking::BookingDraft;
    use swarna_db::{Database, DbConfig};

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingInvoice>>,
    }

    #[async_trait]
    impl InvoiceMailer for RecordingMailer {
        async fn send_invoice(&self, invoice: OutgoingInvoice) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(invoice);
            Ok(())
        }
    }

    struct SlowMailer;

    #[async_trait]
    impl InvoiceMailer for SlowMailer {
        async fn send_invoice(&self, _invoice: OutgoingInvoice) -> Result<(), DeliveryError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    async fn booked(email: &str) -> (DbState, i64) {
        let dir = tempfile::tempdir().unwrap();
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let draft = BookingDraft {
            room: "201".into(),
            name: "Asha Rao".into(),
            email: email.into(),
            check_in: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0),
            days: Some(2),
            rent: 5000,
            advance: 4000,
            ..Default::default()
        };
        let outcome = save_booking(&db, &DocumentStore::new(dir.path()), draft, None, false)
            .await
            .unwrap();
        match outcome {
            SaveOutcome::Saved { id, .. } => (db, id),
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    fn config(timeout_secs: u64) -> ConfigState {
        ConfigState::new(
            AppConfig {
                email_timeout_secs: timeout_secs,
                ..AppConfig::default()
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_invoice_for_booking() {
        let (db, id) = booked("asha@example.com").await;
        let invoice = get_invoice(&db, &config(30), id).await.unwrap();
        assert_eq!(invoice.number, format!("Invoice_{}", id));
        assert_eq!(invoice.hotel_name, "Swarna Villa");
        assert_eq!(invoice.subtotal.units(), 10000);
        assert_eq!(invoice.due.units(), 6000);

        let missing = get_invoice(&db, &config(30), id + 1).await.unwrap_err();
        assert_eq!(missing.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_email_invoice() {
        let (db, id) = booked("asha@example.com").await;
        let mailer = RecordingMailer::default();

        email_invoice(&db, &config(30), &mailer, id, "data:application/pdf;base64,JVBERi0=".into())
            .await
            .unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "asha@example.com");
        assert_eq!(sent[0].subject, "Invoice - Swarna Villa Room 201");
        assert_eq!(sent[0].attachment_name, format!("Invoice_{}.pdf", id));
        assert_eq!(sent[0].attachment, b"%PDF-");
    }

    #[tokio::test]
    async fn test_email_failures() {
        let (db, id) = booked("").await;
        let err = email_invoice(&db, &config(30), &RecordingMailer::default(), id, "JVBERi0=".into())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DeliveryError);
        assert_eq!(err.message, "guest has no email address");

        let (db, id) = booked("asha@example.com").await;
        let err = email_invoice(&db, &config(30), &DisabledMailer, id, "JVBERi0=".into())
            .await
            .unwrap_err();
        assert_eq!(err.message, "email delivery is not configured");

        let err = email_invoice(&db, &config(1), &SlowMailer, id, "JVBERi0=".into())
            .await
            .unwrap_err();
        assert_eq!(err.message, "email delivery timed out after 1 seconds");

        // The booking is untouched by delivery failures.
        let booking = db.inner().bookings().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(booking.due, 6000);
    }
}
