//! # Invoice Email
//!
//! The outbound email collaborator. The desk renders the invoice PDF and
//! this layer hands it, with the subject and body from
//! [`Invoice`](swarna_core::invoice::Invoice), to whatever transport is
//! configured. Delivery failure is reported to the desk and never touches
//! booking data.

use async_trait::async_trait;
use thiserror::Error;

/// One invoice email, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingInvoice {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("email delivery is not configured")]
    NotConfigured,

    #[error("guest has no email address")]
    MissingRecipient,

    #[error("email delivery timed out after {0} seconds")]
    Timeout(u64),

    #[error("email rejected: {0}")]
    Rejected(String),
}

/// Sends invoice emails.
#[async_trait]
pub trait InvoiceMailer: Send + Sync {
    async fn send_invoice(&self, invoice: OutgoingInvoice) -> Result<(), DeliveryError>;

    /// False when every send is bound to fail with `NotConfigured`.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Mailer used when no transport is set up.
#[derive(Debug, Clone, Default)]
pub struct DisabledMailer;

#[async_trait]
impl InvoiceMailer for DisabledMailer {
    async fn send_invoice(&self, _invoice: OutgoingInvoice) -> Result<(), DeliveryError> {
        Err(DeliveryError::NotConfigured)
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
