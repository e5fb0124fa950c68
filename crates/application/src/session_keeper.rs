//! Session acquisition and time-based renewal.
//!
//! The remote API does not tell clients when a session expires, so sessions
//! are replaced once they are older than the configured renewal interval.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use dormant_core::AppResult;
use dormant_domain::{Credentials, SessionId};

use crate::{AccountApi, Clock};

/// Session returned by [`SessionKeeper::ensure_fresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshSession {
    /// Token to use for the next privileged call.
    pub session: SessionId,
    /// Whether the token was obtained by this call.
    pub renewed: bool,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    session: SessionId,
    renewed_at: Instant,
}

/// Owns the active session and renews it when it gets too old.
pub struct SessionKeeper {
    account_api: Arc<dyn AccountApi>,
    clock: Arc<dyn Clock>,
    credentials: Credentials,
    renewal_interval: Duration,
    active: Option<ActiveSession>,
    renewals: u64,
}

impl SessionKeeper {
    /// Creates a keeper without an active session.
    #[must_use]
    pub fn new(
        account_api: Arc<dyn AccountApi>,
        clock: Arc<dyn Clock>,
        credentials: Credentials,
        renewal_interval: Duration,
    ) -> Self {
        Self {
            account_api,
            clock,
            credentials,
            renewal_interval,
            active: None,
            renewals: 0,
        }
    }

    /// Logs in and replaces the active session unconditionally.
    ///
    /// Any API rejection is returned to the caller, which treats it as fatal.
    pub async fn renew(&mut self) -> AppResult<SessionId> {
        let session = self.account_api.login(&self.credentials).await?;
        let renewed_at = self.clock.monotonic_now();

        self.renewals = self.renewals.saturating_add(1);
        info!(
            username = %self.credentials.username(),
            renewals = self.renewals,
            "api session obtained"
        );

        self.active = Some(ActiveSession {
            session: session.clone(),
            renewed_at,
        });
        Ok(session)
    }

    /// Returns a session younger than the renewal interval, logging in again
    /// when none exists or the current one has aged past the interval.
    pub async fn ensure_fresh(&mut self) -> AppResult<FreshSession> {
        let now = self.clock.monotonic_now();

        if let Some(active) = &self.active {
            let age = now.saturating_duration_since(active.renewed_at);
            if age <= self.renewal_interval {
                return Ok(FreshSession {
                    session: active.session.clone(),
                    renewed: false,
                });
            }

            debug!(
                age_ms = u64::try_from(age.as_millis()).unwrap_or(u64::MAX),
                "api session expired locally"
            );
        }

        let session = self.renew().await?;
        Ok(FreshSession {
            session,
            renewed: true,
        })
    }

    /// Number of successful logins so far.
    #[must_use]
    pub fn renewals(&self) -> u64 {
        self.renewals
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use dormant_core::{ApiError, AppError};
    use dormant_domain::Credentials;

    use super::SessionKeeper;
    use crate::test_doubles::{ManualClock, ScriptedAccountApi};

    fn credentials() -> Credentials {
        Credentials::new("admin@example.edu", "secret")
            .unwrap_or_else(|error| panic!("credentials should be valid: {error}"))
    }

    #[tokio::test]
    async fn first_call_always_logs_in() {
        let api = Arc::new(ScriptedAccountApi::default());
        let clock = Arc::new(ManualClock::default());
        let mut keeper = SessionKeeper::new(
            api.clone(),
            clock.clone(),
            credentials(),
            Duration::from_secs(20),
        );

        let fresh = keeper
            .ensure_fresh()
            .await
            .unwrap_or_else(|error| panic!("login should succeed: {error}"));

        assert!(fresh.renewed);
        assert_eq!(fresh.session.as_str(), "sid-1");
        assert_eq!(api.login_count(), 1);
    }

    #[tokio::test]
    async fn session_is_reused_until_interval_is_exceeded() {
        let api = Arc::new(ScriptedAccountApi::default());
        let clock = Arc::new(ManualClock::default());
        let mut keeper = SessionKeeper::new(
            api.clone(),
            clock.clone(),
            credentials(),
            Duration::from_secs(20),
        );

        let _ = keeper.ensure_fresh().await;
        clock.advance(Duration::from_secs(20));
        let at_interval = keeper
            .ensure_fresh()
            .await
            .unwrap_or_else(|error| panic!("reuse should succeed: {error}"));
        assert!(!at_interval.renewed);
        assert_eq!(at_interval.session.as_str(), "sid-1");

        clock.advance(Duration::from_millis(1));
        let past_interval = keeper
            .ensure_fresh()
            .await
            .unwrap_or_else(|error| panic!("renewal should succeed: {error}"));
        assert!(past_interval.renewed);
        assert_eq!(past_interval.session.as_str(), "sid-2");
        assert_eq!(keeper.renewals(), 2);
    }

    #[tokio::test]
    async fn rejected_login_is_returned_as_api_error() {
        let api = Arc::new(ScriptedAccountApi::default());
        api.reject_logins(ApiError::new(401, "login", "Invalid username or password"));
        let mut keeper = SessionKeeper::new(
            api,
            Arc::new(ManualClock::default()),
            credentials(),
            Duration::from_secs(20),
        );

        let result = keeper.ensure_fresh().await;

        assert!(matches!(result, Err(AppError::Api(error)) if error.name() == "login"));
        assert_eq!(keeper.renewals(), 0);
    }
}
