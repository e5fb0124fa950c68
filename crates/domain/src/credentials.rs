//! API credentials and session tokens.

use dormant_core::{AppError, AppResult, NonEmptyString};

/// Username and password used to open API sessions.
#[derive(Clone)]
pub struct Credentials {
    username: NonEmptyString,
    password: String,
}

impl Credentials {
    /// Creates validated credentials. Both parts must be non-empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> AppResult<Self> {
        let username = NonEmptyString::new(username.into().trim())
            .map_err(|_| AppError::Validation("API username must not be empty".to_owned()))?;
        let password = password.into();
        if password.is_empty() {
            return Err(AppError::Validation(
                "API password must not be empty".to_owned(),
            ));
        }

        Ok(Self { username, password })
    }

    /// Returns the API username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the plaintext API password. Never log this value.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username.as_str())
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque session token returned by the `login` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(NonEmptyString);

impl SessionId {
    /// Wraps a session token received from the API.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AppError::Protocol("session ID must not be empty".to_owned()))
    }

    /// Returns the token as sent on privileged calls.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let credentials = Credentials::new("admin@example.edu", "hunter2-secret")
            .unwrap_or_else(|error| panic!("credentials should be valid: {error}"));
        let rendered = format!("{credentials:?}");

        assert!(rendered.contains("admin@example.edu"));
        assert!(!rendered.contains("hunter2-secret"));
    }

    #[test]
    fn blank_username_is_rejected() {
        assert!(Credentials::new("  ", "secret").is_err());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(Credentials::new("admin", "").is_err());
    }

    #[test]
    fn empty_session_id_is_a_protocol_error() {
        assert!(matches!(SessionId::new(""), Err(AppError::Protocol(_))));
    }
}
