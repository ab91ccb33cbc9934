//! # Admin Password Commands
//!
//! One shared password guards the admin screens (rates, deletes, settings).
//!
//! | Stored value        | Accepted password            |
//! |---------------------|------------------------------|
//! | none                | `admin123` (logged as warn)  |
//! | argon2 PHC string   | whatever hashes to it        |
//! | anything else       | that exact text (legacy)     |

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::ConfigState;
use swarna_core::ValidationError;

/// Accepted until an admin password has been set.
const FALLBACK_ADMIN_PASSWORD: &str = "admin123";

const MIN_PASSWORD_LEN: usize = 6;

fn password_matches(password: &str, stored: Option<&str>) -> bool {
    let Some(stored) = stored else {
        warn!("No admin password set, accepting the default password");
        return password == FALLBACK_ADMIN_PASSWORD;
    };

    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            warn!("Admin password is stored as plain text; change it to upgrade");
            password == stored
        }
    }
}

/// Hashes a password for `config.toml`.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

pub fn verify_admin_password(config: &ConfigState, password: String) -> bool {
    password_matches(&password, config.get().admin_password_hash.as_deref())
}

/// Replaces the admin password after checking the current one.
pub fn change_admin_password(
    config: &ConfigState,
    current: String,
    new_password: String,
) -> Result<(), ApiError> {
    if !verify_admin_password(config, current) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let new_password = new_password.trim();
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("must be at least {} characters", MIN_PASSWORD_LEN),
        }
        .into());
    }

    let hash = hash_password(new_password)?;
    config.update(|c| c.admin_password_hash = Some(hash))?;

    info!("Admin password changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;

    fn state(stored: Option<&str>) -> ConfigState {
        ConfigState::new(
            AppConfig {
                admin_password_hash: stored.map(str::to_string),
                ..AppConfig::default()
            },
            None,
        )
    }

    #[test]
    fn test_default_password_until_set() {
        let config = state(None);
        assert!(verify_admin_password(&config, "admin123".into()));
        assert!(!verify_admin_password(&config, "admin".into()));
    }

    #[test]
    fn test_legacy_plain_text() {
        let config = state(Some("frontdesk"));
        assert!(verify_admin_password(&config, "frontdesk".into()));
        assert!(!verify_admin_password(&config, "admin123".into()));
    }

    #[test]
    fn test_change_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = ConfigState::new(AppConfig::default(), Some(path.clone()));

        let err = change_admin_password(&config, "wrong".into(), "swarna-2025".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = change_admin_password(&config, "admin123".into(), "abc".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        change_admin_password(&config, "admin123".into(), "swarna-2025".into()).unwrap();
        let stored = config.get().admin_password_hash.unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(verify_admin_password(&config, "swarna-2025".into()));
        assert!(!verify_admin_password(&config, "admin123".into()));

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains(&stored));
    }
}
