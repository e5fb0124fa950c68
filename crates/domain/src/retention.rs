//! Retention policy for dormant accounts.

use chrono::NaiveDateTime;

const SECONDS_PER_DAY: i64 = 86_400;

/// Outcome of checking a record against the retention policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionDecision {
    /// The account has been idle long enough to be dropped.
    Drop,
    /// The account is still inside the retention window.
    Retain,
}

/// Drops accounts whose last login is at least `threshold_days` old.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    threshold_days: u64,
}

impl RetentionPolicy {
    /// Creates a policy with the given threshold in whole days.
    #[must_use]
    pub fn new(threshold_days: u64) -> Self {
        Self { threshold_days }
    }

    /// Returns the threshold in days.
    #[must_use]
    pub fn threshold_days(&self) -> u64 {
        self.threshold_days
    }

    /// Whole days elapsed between `last_login` and `now`.
    ///
    /// Partial days are floored, so a login in the future yields a negative
    /// count rather than zero.
    #[must_use]
    pub fn days_since(last_login: NaiveDateTime, now: NaiveDateTime) -> i64 {
        (now - last_login)
            .num_seconds()
            .div_euclid(SECONDS_PER_DAY)
    }

    /// Decides whether an account idle for `idle_days` is dropped.
    #[must_use]
    pub fn decide(&self, idle_days: i64) -> RetentionDecision {
        match u64::try_from(idle_days) {
            Ok(days) if days >= self.threshold_days => RetentionDecision::Drop,
            _ => RetentionDecision::Retain,
        }
    }
}
