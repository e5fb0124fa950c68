//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod credentials;
mod retention;
mod run_configuration;
mod user;

pub use credentials::{Credentials, SessionId};
pub use retention::{RetentionDecision, RetentionPolicy};
pub use run_configuration::{
    DEFAULT_BATCH_SIZE, DEFAULT_OFFSET, DEFAULT_PAUSE_SECONDS, DEFAULT_RENEW_SESSION_SECONDS,
    DEFAULT_RETENTION_DAYS, RunConfiguration, RunOptions,
};
pub use user::{LOGIN_TIMESTAMP_FORMAT, UserId, UserRecord};
