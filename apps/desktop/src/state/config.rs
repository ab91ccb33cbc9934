//! # Configuration State
//!
//! Hotel details, where ID scans go, the admin password hash and email
//! settings.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SWARNA_*`)
//! 2. Config file (`config.toml`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Read on almost every command, written only when the admin password or
//! the ID document folder changes, so it sits behind an `RwLock`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_HOTEL_NAME: &str = "Swarna Villa";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Application configuration, as stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shown on invoices and in email text.
    pub hotel_name: String,

    pub currency_symbol: String,

    /// Where ID scans are written. Defaults to `guest_docs` next to the database.
    pub guest_docs_dir: Option<PathBuf>,

    /// Argon2 PHC string. `None` until the admin sets a password.
    pub admin_password_hash: Option<String>,

    /// From-address for invoice email. Email is off while this is unset.
    pub email_sender: Option<String>,

    pub email_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            hotel_name: DEFAULT_HOTEL_NAME.to_string(),
            currency_symbol: "₹".to_string(),
            guest_docs_dir: None,
            admin_password_hash: None,
            email_sender: None,
            email_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading app config from file");
                config = toml::from_str(&std::fs::read_to_string(path)?)?;
            } else {
                debug!(?path, "App config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        info!(?path, "App config saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hotel_name.trim().is_empty() {
            return Err(ConfigError::Invalid("hotel_name must not be empty".into()));
        }
        if self.email_timeout_secs == 0 {
            return Err(ConfigError::Invalid("email_timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// - `SWARNA_HOTEL_NAME`
    /// - `SWARNA_GUEST_DOCS_DIR`
    /// - `SWARNA_EMAIL_SENDER`
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("SWARNA_HOTEL_NAME") {
            self.hotel_name = name;
        }
        if let Ok(dir) = std::env::var("SWARNA_GUEST_DOCS_DIR") {
            debug!(dir = %dir, "Overriding guest docs dir from environment");
            self.guest_docs_dir = Some(PathBuf::from(dir));
        }
        if let Ok(sender) = std::env::var("SWARNA_EMAIL_SENDER") {
            self.email_sender = Some(sender).filter(|s| !s.trim().is_empty());
        }
    }

    pub fn email_timeout(&self) -> Duration {
        Duration::from_secs(self.email_timeout_secs)
    }

    /// Formats whole rupees for display.
    ///
    /// ```rust,ignore
    /// assert_eq!(AppConfig::default().format_currency(-2500), "-₹2500");
    /// ```
    pub fn format_currency(&self, units: i64) -> String {
        format!(
            "{}{}{}",
            if units < 0 { "-" } else { "" },
            self.currency_symbol,
            units.unsigned_abs()
        )
    }
}

/// What the settings screen sees. The password hash never leaves the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigDto {
    pub hotel_name: String,
    pub currency_symbol: String,
    pub guest_docs_dir: Option<String>,
    pub email_enabled: bool,
    pub admin_password_set: bool,
}

impl AppConfigDto {
    /// `mailer_ready` is whether the installed transport can send at all;
    /// a sender address alone does not turn email on.
    pub fn new(c: &AppConfig, mailer_ready: bool) -> Self {
        AppConfigDto {
            hotel_name: c.hotel_name.clone(),
            currency_symbol: c.currency_symbol.clone(),
            guest_docs_dir: c.guest_docs_dir.as_ref().map(|p| p.display().to_string()),
            email_enabled: mailer_ready && c.email_sender.is_some(),
            admin_password_set: c.admin_password_hash.is_some(),
        }
    }
}

/// Shared, persisted configuration.
#[derive(Debug)]
pub struct ConfigState {
    config: RwLock<AppConfig>,
    /// File changes are written back to. `None` keeps them in memory only.
    path: Option<PathBuf>,
}

impl ConfigState {
    pub fn new(config: AppConfig, path: Option<PathBuf>) -> Self {
        ConfigState {
            config: RwLock::new(config),
            path,
        }
    }

    /// Loads from `path`, falling back to defaults when the file is unusable.
    pub fn load(path: Option<PathBuf>) -> Self {
        let config = AppConfig::load(path.as_deref()).unwrap_or_else(|e| {
            warn!("Failed to load app config: {}. Using defaults.", e);
            AppConfig::default()
        });
        ConfigState::new(config, path)
    }

    /// A snapshot of the current configuration.
    pub fn get(&self) -> AppConfig {
        self.config.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// Applies `change` and writes the result to disk.
    pub fn update(&self, change: impl FnOnce(&mut AppConfig)) -> Result<(), ConfigError> {
        let mut guard = self
            .config
            .write()
            .map_err(|_| ConfigError::Invalid("config lock poisoned".into()))?;

        let mut next = guard.clone();
        change(&mut next);
        next.validate()?;

        if let Some(path) = &self.path {
            next.save(path)?;
        }
        *guard = next;
        Ok(())
    }

    /// The default config file location.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "swarna", "pms")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(3000), "₹3000");
        assert_eq!(config.format_currency(0), "₹0");
        assert_eq!(config.format_currency(-2500), "-₹2500");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("hotel_name = \"Swarna Villa Puri\"").unwrap();
        assert_eq!(config.hotel_name, "Swarna Villa Puri");
        assert_eq!(config.email_timeout_secs, 30);
        assert!(config.admin_password_hash.is_none());
    }

    #[test]
    fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let state = ConfigState::new(AppConfig::default(), Some(path.clone()));

        state
            .update(|c| c.email_sender = Some("desk@swarnavilla.in".into()))
            .unwrap();
        assert_eq!(state.get().email_sender.as_deref(), Some("desk@swarnavilla.in"));

        let reloaded: AppConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.email_sender.as_deref(), Some("desk@swarnavilla.in"));
    }

    #[test]
    fn test_invalid_update_is_discarded() {
        let state = ConfigState::new(AppConfig::default(), None);
        assert!(state.update(|c| c.hotel_name = "  ".into()).is_err());
        assert_eq!(state.get().hotel_name, "Swarna Villa");
    }

    #[test]
    fn test_dto_hides_hash() {
        let config = AppConfig {
            admin_password_hash: Some("$argon2id$...".into()),
            ..AppConfig::default()
        };
        let json = serde_json::to_value(AppConfigDto::new(&config, true)).unwrap();
        assert_eq!(json["adminPasswordSet"], true);
        assert!(json.get("adminPasswordHash").is_none());
    }
}
