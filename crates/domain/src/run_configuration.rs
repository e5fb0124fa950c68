//! Immutable settings for one cleanup run.

use std::time::Duration;

use crate::RetentionPolicy;

/// Default seconds between forced session renewals.
pub const DEFAULT_RENEW_SESSION_SECONDS: u64 = 20;
/// Default retention threshold: three years.
pub const DEFAULT_RETENTION_DAYS: u64 = 1095;
/// Default number of drop calls per batch.
pub const DEFAULT_BATCH_SIZE: u64 = 40;
/// Default pause between batches, in seconds.
pub const DEFAULT_PAUSE_SECONDS: u64 = 1;
/// Default number of leading records to skip.
pub const DEFAULT_OFFSET: u64 = 0;

/// Options as supplied on the command line, before normalization.
///
/// Numeric values are signed so that negative input can be detected and
/// replaced by the option's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Seconds between session renewals.
    pub renew_session_seconds: Option<i64>,
    /// Retention threshold in days.
    pub retention_days: Option<i64>,
    /// Cap on records processed after the offset window.
    pub limit: Option<i64>,
    /// Drop calls per batch before pausing.
    pub batch_size: Option<i64>,
    /// Pause between batches, in seconds.
    pub pause_seconds: Option<i64>,
    /// Leading records to skip.
    pub offset: Option<i64>,
    /// Echo skipped records.
    pub verbose: bool,
    /// Report intended drops without calling the API.
    pub dry_run: bool,
}

/// Normalized configuration passed to the cleanup driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    /// Maximum age of a session before it is renewed.
    pub session_renewal_interval: Duration,
    /// Retention policy applied to every evaluated record.
    pub retention: RetentionPolicy,
    /// Cap on records evaluated after the offset window; `None` is unbounded.
    pub limit: Option<u64>,
    /// Drop calls issued before a batch pause.
    pub batch_size: u64,
    /// Length of the batch pause.
    pub batch_pause: Duration,
    /// Number of leading records skipped.
    pub offset: u64,
    /// Echo skipped records.
    pub verbose: bool,
    /// Report intended drops without calling the API.
    pub dry_run: bool,
}

impl RunConfiguration {
    /// Normalizes raw options. Negative values fall back to the defaults;
    /// a negative limit means no limit.
    #[must_use]
    pub fn from_options(options: &RunOptions) -> Self {
        Self {
            session_renewal_interval: Duration::from_secs(non_negative_or(
                options.renew_session_seconds,
                DEFAULT_RENEW_SESSION_SECONDS,
            )),
            retention: RetentionPolicy::new(non_negative_or(
                options.retention_days,
                DEFAULT_RETENTION_DAYS,
            )),
            limit: options.limit.and_then(|value| u64::try_from(value).ok()),
            batch_size: non_negative_or(options.batch_size, DEFAULT_BATCH_SIZE),
            batch_pause: Duration::from_secs(non_negative_or(
                options.pause_seconds,
                DEFAULT_PAUSE_SECONDS,
            )),
            offset: non_negative_or(options.offset, DEFAULT_OFFSET),
            verbose: options.verbose,
            dry_run: options.dry_run,
        }
    }
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self::from_options(&RunOptions::default())
    }
}

fn non_negative_or(value: Option<i64>, default: u64) -> u64 {
    value
        .and_then(|value| u64::try_from(value).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RunConfiguration::default();

        assert_eq!(config.session_renewal_interval, Duration::from_secs(20));
        assert_eq!(config.retention.threshold_days(), 1095);
        assert_eq!(config.limit, None);
        assert_eq!(config.batch_size, 40);
        assert_eq!(config.batch_pause, Duration::from_secs(1));
        assert_eq!(config.offset, 0);
        assert!(!config.verbose);
        assert!(!config.dry_run);
    }

    #[test]
    fn negative_values_fall_back_to_defaults() {
        let config = RunConfiguration::from_options(&RunOptions {
            renew_session_seconds: Some(-5),
            retention_days: Some(-1),
            limit: Some(-3),
            batch_size: Some(-40),
            pause_seconds: Some(-2),
            offset: Some(-10),
            verbose: true,
            dry_run: true,
        });

        assert_eq!(config, RunConfiguration {
            verbose: true,
            dry_run: true,
            ..RunConfiguration::default()
        });
    }

    #[test]
    fn zero_limit_is_kept() {
        let config = RunConfiguration::from_options(&RunOptions {
            limit: Some(0),
            ..RunOptions::default()
        });
        assert_eq!(config.limit, Some(0));
    }

    proptest! {
        #[test]
        fn non_negative_values_are_kept(value in 0_i64..1_000_000) {
            let config = RunConfiguration::from_options(&RunOptions {
                renew_session_seconds: Some(value),
                retention_days: Some(value),
                limit: Some(value),
                batch_size: Some(value),
                pause_seconds: Some(value),
                offset: Some(value),
                verbose: false,
                dry_run: false,
            });
            let expected = value as u64;

            prop_assert_eq!(config.session_renewal_interval.as_secs(), expected);
            prop_assert_eq!(config.retention.threshold_days(), expected);
            prop_assert_eq!(config.limit, Some(expected));
            prop_assert_eq!(config.batch_size, expected);
            prop_assert_eq!(config.batch_pause.as_secs(), expected);
            prop_assert_eq!(config.offset, expected);
        }
    }
}
