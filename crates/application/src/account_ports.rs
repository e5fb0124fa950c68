use async_trait::async_trait;

use dormant_core::AppResult;
use dormant_domain::{Credentials, SessionId, UserId};

/// Result of a successful `user.drop` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOutcome {
    /// First message returned by the API, if any.
    pub message: Option<String>,
}

/// Port for the remote account administration API.
///
/// Application-level rejections are returned as `AppError::Api`; transport
/// and protocol failures use their own variants and are fatal for callers.
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Opens a session with the given credentials.
    async fn login(&self, credentials: &Credentials) -> AppResult<SessionId>;

    /// Drops the user with the given identifier.
    async fn drop_user(&self, session: &SessionId, user_id: UserId) -> AppResult<DropOutcome>;
}
