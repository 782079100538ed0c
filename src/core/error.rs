//! Error types for the mapper
//!
//! # Error Categories
//!
//! - [`CrudError`]: the structured `{message, code}` body returned to
//!   clients for not-found and validation failures
//! - [`StorageError`]: failures raised by a [`Backend`](crate::core::Backend)
//!
//! Only not-found (404) and method-not-allowed (405) are mapped onto an
//! HTTP status. Validation and backend errors travel in the body of an
//! HTTP 200 response, a contract existing clients rely on.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message used for every not-found response
pub const NOT_FOUND_MESSAGE: &str = "Status Not Found";

// =============================================================================
// CrudError
// =============================================================================

/// Structured error body: `{"message": "...", "code": N}`
///
/// Returned by validators and by the handlers when a record is missing.
///
/// # Example
///
/// ```rust,ignore
/// #[async_trait]
/// impl ValidateSave for Category {
///     async fn validate_save(&self, _store: &Store) -> Result<(), CrudError> {
///         if self.category_id.is_none() {
///             return Err(CrudError::new("CategoryID can't not be null", 500));
///         }
///         Ok(())
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrudError {
    pub message: String,
    pub code: u16,
}

impl CrudError {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// The 404 body shared by Get, Delete and the link root lookup
    pub fn not_found() -> Self {
        Self::new(NOT_FOUND_MESSAGE, StatusCode::NOT_FOUND.as_u16())
    }

    /// The 405 body of a link path called with another method
    pub fn method_not_allowed() -> Self {
        Self::new(
            "Method Not Allowed",
            StatusCode::METHOD_NOT_ALLOWED.as_u16(),
        )
    }

    /// A request body that could not be decoded into the entity type
    pub fn invalid_payload(reason: impl fmt::Display) -> Self {
        Self::new(
            format!("Invalid Payload ({})", reason),
            StatusCode::BAD_REQUEST.as_u16(),
        )
    }

    pub fn is_not_found(&self) -> bool {
        self.code == StatusCode::NOT_FOUND.as_u16()
    }

    /// HTTP status used when this error is the whole response.
    ///
    /// Only not-found and method-not-allowed change the status line;
    /// everything else is reported in-body with 200.
    pub fn status_code(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.code == StatusCode::METHOD_NOT_ALLOWED.as_u16() {
            StatusCode::METHOD_NOT_ALLOWED
        } else {
            StatusCode::OK
        }
    }
}

impl fmt::Display for CrudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for CrudError {}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by persistence backends
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A lock guarding in-memory state was poisoned
    #[error("failed to acquire {0} lock")]
    Lock(&'static str),

    /// An entity could not be turned into a record
    #[error("failed to encode {kind}: {message}")]
    Encode { kind: String, message: String },

    /// A stored record could not be turned back into an entity
    #[error("failed to decode {kind}: {message}")]
    Decode { kind: String, message: String },

    /// A record does not have the shape the store expects
    #[error("invalid {kind} record: {message}")]
    InvalidRecord { kind: String, message: String },

    /// Error reported by a database driver
    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    pub fn encode(kind: &str, err: impl fmt::Display) -> Self {
        Self::Encode {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }

    pub fn decode(kind: &str, err: impl fmt::Display) -> Self {
        Self::Decode {
            kind: kind.to_string(),
            message: err.to_string(),
        }
    }

    pub fn invalid_record(kind: &str, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind: kind.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

/// Result alias for backend operations
pub type StorageResult<T> = Result<T, StorageError>;
