use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Status value the remote API reports for a successful call.
pub const API_STATUS_OK: i64 = 200;

/// Application-level failure reported by the remote account API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    status: i64,
    name: String,
    message: String,
}

impl ApiError {
    /// Creates an API error from the decoded response fields.
    #[must_use]
    pub fn new(status: i64, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the `api_status` code carried by the response.
    #[must_use]
    pub fn status(&self) -> i64 {
        self.status
    }

    /// Returns the error category, e.g. a field name or `login`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl Display for ApiError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "({}) {} -> {}",
            self.status, self.name, self.message
        )
    }
}
