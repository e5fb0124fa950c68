//! Shared primitives for all Rust crates in dormant.

#![forbid(unsafe_code)]

/// Application-level errors reported by the remote account API.
pub mod api_error;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use api_error::{API_STATUS_OK, ApiError};

/// Result type used across dormant crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote endpoint could not be reached, retries included.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote endpoint answered with something other than the expected
    /// XML-RPC document.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The remote API rejected the call.
    #[error("{0}")]
    Api(ApiError),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}
