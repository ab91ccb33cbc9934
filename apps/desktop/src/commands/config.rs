//! # Configuration Commands

use std::path::PathBuf;

use swarna_core::ValidationError;
use tracing::info;

use crate::documents::DocumentStore;
use crate::error::ApiError;
use crate::mailer::InvoiceMailer;
use crate::state::{AppConfigDto, ConfigState};

/// Settings for the UI. Never includes the password hash.
///
/// Email only counts as enabled when a sender is configured and the
/// installed mailer can actually deliver.
pub fn get_config(config: &ConfigState, mailer: &dyn InvoiceMailer) -> AppConfigDto {
    AppConfigDto::new(&config.get(), mailer.is_enabled())
}

/// Moves where new ID scans are written.
///
/// The folder is created first, then the choice is saved to config.toml,
/// then uploads start landing there. Scans already on file are not moved.
pub fn set_guest_docs_dir(
    config: &ConfigState,
    docs: &DocumentStore,
    dir: &str,
) -> Result<String, ApiError> {
    let dir = dir.trim();
    if dir.is_empty() {
        return Err(ValidationError::Required {
            field: "guestDocsDir".to_string(),
        }
        .into());
    }

    let root = PathBuf::from(dir);
    std::fs::create_dir_all(&root).map_err(|e| {
        ApiError::config(format!("Could not create {}: {}", root.display(), e))
    })?;

    config.update(|c| c.guest_docs_dir = Some(root.clone()))?;
    let root = docs.relocate(root)?;

    info!(dir = %root.display(), "Guest document folder updated");
    Ok(root.display().to_string())
}

/// Formats whole rupees with the configured currency symbol.
pub fn format_currency(config: &ConfigState, units: i64) -> String {
    config.get().format_currency(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::mailer::{DeliveryError, DisabledMailer, OutgoingInvoice};
    use crate::state::AppConfig;
    use async_trait::async_trait;

    struct SmtpStandIn;

    #[async_trait]
    impl InvoiceMailer for SmtpStandIn {
        async fn send_invoice(&self, _invoice: OutgoingInvoice) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    #[test]
    fn test_email_enabled_needs_sender_and_mailer() {
        let config = ConfigState::new(
            AppConfig {
                email_sender: Some("desk@swarnavilla.in".into()),
                ..AppConfig::default()
            },
            None,
        );
        assert!(!get_config(&config, &DisabledMailer).email_enabled);
        assert!(get_config(&config, &SmtpStandIn).email_enabled);

        let no_sender = ConfigState::new(AppConfig::default(), None);
        assert!(!get_config(&no_sender, &SmtpStandIn).email_enabled);
    }

    #[test]
    fn test_set_guest_docs_dir_persists_and_relocates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = ConfigState::new(AppConfig::default(), Some(path.clone()));
        let docs = DocumentStore::new(dir.path().join("guest_docs"));

        let target = dir.path().join("Scans").join("IDs");
        let saved = set_guest_docs_dir(&config, &docs, target.to_str().unwrap()).unwrap();

        assert_eq!(saved, target.display().to_string());
        assert!(target.is_dir());
        assert_eq!(docs.root(), target);
        assert_eq!(config.get().guest_docs_dir.as_deref(), Some(target.as_path()));
        assert_eq!(
            get_config(&config, &DisabledMailer).guest_docs_dir,
            Some(target.display().to_string())
        );

        let reloaded = AppConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(reloaded.guest_docs_dir, Some(target));
    }

    #[test]
    fn test_set_guest_docs_dir_rejects_blank() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigState::new(AppConfig::default(), None);
        let docs = DocumentStore::new(dir.path());

        let err = set_guest_docs_dir(&config, &docs, "   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(docs.root(), dir.path());
        assert!(config.get().guest_docs_dir.is_none());
    }
}
