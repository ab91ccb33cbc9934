//! # Sync Errors
//!
//! A run that returns any of these has inserted nothing: the fetch phase
//! either finished for every channel or the batch was never written.

use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// ota.toml parsed but makes no sense (zero timeout, duplicate channel).
    #[error("Invalid OTA configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Every channel is switched off.
    #[error("No OTA channels are enabled")]
    NoChannels,

    /// A channel could not be reached or answered with garbage.
    #[error("Fetching from {platform} failed: {reason}")]
    FetchFailed { platform: String, reason: String },

    /// The whole fetch phase overran its budget.
    #[error("OTA fetch timed out after {0} seconds")]
    Timeout(u64),

    /// Reading the dedup snapshot or writing the batch failed.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<swarna_db::DbError> for SyncError {
    fn from(err: swarna_db::DbError) -> Self {
        SyncError::DatabaseError(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

impl SyncError {
    pub fn fetch(platform: impl Into<String>, reason: impl Into<String>) -> Self {
        SyncError::FetchFailed {
            platform: platform.into(),
            reason: reason.into(),
        }
    }

    /// Pressing "Sync" again may help. Repeating a run never duplicates a
    /// reservation, since stored payment references are skipped.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::FetchFailed { .. } | SyncError::Timeout(_) | SyncError::DatabaseError(_)
        )
    }

    /// Needs a change to ota.toml before another run can succeed.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
                | SyncError::NoChannels
        )
    }
}
