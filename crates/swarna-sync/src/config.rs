//! # OTA Configuration
//!
//! Which channels the desk pulls reservations from, and how long it waits.
//!
//! Values come from built-in defaults (every known channel, 20 second
//! budget), then `ota.toml` in the platform config dir, then the
//! environment: `SWARNA_OTA_TIMEOUT_SECS` and `SWARNA_OTA_CHANNELS`
//! (comma-separated; exactly those channels end up enabled).
//!
//! ## ota.toml
//! ```toml
//! [sync]
//! fetch_timeout_secs = 20
//!
//! [[channels]]
//! platform = "Booking.com"
//! enabled = true
//! property_id = "SV-1182"
//! api_key = "..."
//!
//! [[channels]]
//! platform = "Airbnb"
//! enabled = false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use swarna_core::ota::OtaPlatform;

use crate::error::{SyncError, SyncResult};

/// Longest fetch timeout accepted from config.
const MAX_FETCH_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// Channel Configuration
// =============================================================================

/// One booking channel and the credentials its feed needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub platform: OtaPlatform,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// The hotel's id on the channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ChannelConfig {
    /// An enabled channel with no credentials.
    pub fn new(platform: OtaPlatform) -> Self {
        ChannelConfig {
            platform,
            enabled: true,
            property_id: None,
            api_key: None,
        }
    }
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Sync Settings
// =============================================================================

/// The `[sync]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Budget for fetching from every channel, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_fetch_timeout() -> u64 {
    20
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

// =============================================================================
// Main OTA Configuration
// =============================================================================

/// Parsed ota.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtaConfig {
    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,
}

fn default_channels() -> Vec<ChannelConfig> {
    OtaPlatform::KNOWN
        .iter()
        .cloned()
        .map(ChannelConfig::new)
        .collect()
}

impl Default for OtaConfig {
    fn default() -> Self {
        OtaConfig {
            sync: SyncSettings::default(),
            channels: default_channels(),
        }
    }
}

impl OtaConfig {
    /// Defaults, overlaid by the file when it exists, overlaid by the
    /// environment. A missing file is not an error.
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading OTA config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "OTA config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Startup must not fail over a broken ota.toml; sync with defaults instead.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load OTA config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "OTA config saved");
        Ok(())
    }

    /// Timeout within 1..=300 seconds and no channel listed twice.
    pub fn validate(&self) -> SyncResult<()> {
        if self.sync.fetch_timeout_secs == 0 || self.sync.fetch_timeout_secs > MAX_FETCH_TIMEOUT_SECS
        {
            return Err(SyncError::InvalidConfig(format!(
                "fetch_timeout_secs must be between 1 and {}",
                MAX_FETCH_TIMEOUT_SECS
            )));
        }

        let mut seen = HashSet::new();
        for channel in &self.channels {
            if channel.platform.name().trim().is_empty() {
                return Err(SyncError::InvalidConfig("channel platform is empty".into()));
            }
            if !seen.insert(channel.platform.clone()) {
                return Err(SyncError::InvalidConfig(format!(
                    "channel {} is listed twice",
                    channel.platform
                )));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(secs) = std::env::var("SWARNA_OTA_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => {
                    debug!(secs = s, "Overriding fetch timeout from environment");
                    self.sync.fetch_timeout_secs = s;
                }
                Err(_) => warn!(value = %secs, "Ignoring non-numeric SWARNA_OTA_TIMEOUT_SECS"),
            }
        }

        // Restricts sync to the listed channels, adding any that are missing.
        if let Ok(list) = std::env::var("SWARNA_OTA_CHANNELS") {
            debug!(channels = %list, "Overriding enabled channels from environment");
            self.enable_only(list.split(',').map(OtaPlatform::parse));
        }
    }

    /// Enables exactly the given platforms.
    pub fn enable_only(&mut self, platforms: impl IntoIterator<Item = OtaPlatform>) {
        let wanted: Vec<OtaPlatform> = platforms
            .into_iter()
            .filter(|p| !p.name().is_empty())
            .collect();

        for channel in &mut self.channels {
            channel.enabled = wanted.contains(&channel.platform);
        }
        for platform in wanted {
            if !self.channels.iter().any(|c| c.platform == platform) {
                self.channels.push(ChannelConfig::new(platform));
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "swarna", "pms")
            .map(|dirs| dirs.config_dir().join("ota.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Channels that take part in a sync, in config order.
    pub fn enabled_channels(&self) -> impl Iterator<Item = &ChannelConfig> {
        self.channels.iter().filter(|c| c.enabled)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.sync.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OtaConfig::default();
        assert_eq!(config.sync.fetch_timeout_secs, 20);
        assert_eq!(config.enabled_channels().count(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = OtaConfig::default();

        config.sync.fetch_timeout_secs = 0;
        assert!(config.validate().unwrap_err().is_config_error());

        config.sync.fetch_timeout_secs = 10;
        config.channels.push(ChannelConfig::new(OtaPlatform::Agoda));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enable_only() {
        let mut config = OtaConfig::default();
        config.enable_only(vec![
            OtaPlatform::parse("booking.com"),
            OtaPlatform::parse("Hostelworld"),
        ]);

        let enabled: Vec<&str> = config.enabled_channels().map(|c| c.platform.name()).collect();
        assert_eq!(enabled, vec!["Booking.com", "Hostelworld"]);
        assert_eq!(config.channels.len(), 7);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ota.toml");

        let mut config = OtaConfig::default();
        config.sync.fetch_timeout_secs = 45;
        config.channels[0].property_id = Some("SV-1182".into());
        config.channels[4].enabled = false;
        config.save(Some(path.clone())).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[[channels]]"));
        assert!(written.contains("platform = \"Booking.com\""));

        let loaded: OtaConfig = toml::from_str(&written).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: OtaConfig = toml::from_str(
            r#"
            [[channels]]
            platform = "Agoda"
            "#,
        )
        .unwrap();

        assert_eq!(config.sync.fetch_timeout_secs, 20);
        assert_eq!(config.channels.len(), 1);
        assert!(config.channels[0].enabled);
    }
}
