//! # Command Errors
//!
//! Every command returns `Result<T, ApiError>`. The UI shell gets a stable
//! `code` to branch on and a `message` it can show as-is:
//!
//! ```json
//! { "code": "NOT_FOUND", "message": "Booking not found: 42" }
//! ```
//!
//! Store, sync, email, document and config failures all funnel in through
//! the `From` impls below. Internal detail is logged here and kept out of
//! the message. A room conflict never shows up as an `ApiError`:
//! `save_booking` returns it as an outcome the desk confirms.

use serde::Serialize;
use swarna_core::ValidationError;
use swarna_db::DbError;
use swarna_sync::SyncError;

use crate::documents::DocumentError;
use crate::mailer::DeliveryError;
use crate::state::config::ConfigError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    DatabaseError,
    SyncError,
    DeliveryError,
    Unauthorized,
    ConfigError,
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConstraintViolation { message } => {
                tracing::warn!(%message, "Row rejected by schema");
                ApiError::validation("The booking store rejected this record")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "The booking store is busy, try again")
            }
            other => {
                tracing::error!(error = %other, "Booking store failure");
                ApiError::new(ErrorCode::DatabaseError, "The booking store is unavailable")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        let code = if err.is_config_error() {
            ErrorCode::ConfigError
        } else {
            ErrorCode::SyncError
        };
        if let SyncError::DatabaseError(ref e) = err {
            tracing::error!("OTA sync database failure: {}", e);
        }
        ApiError::new(code, err.to_string())
    }
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        ApiError::new(ErrorCode::DeliveryError, err.to_string())
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Io(e) => {
                tracing::error!("ID document write failed: {}", e);
                ApiError::internal("Could not save the ID document")
            }
            other => ApiError::validation(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::config(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
