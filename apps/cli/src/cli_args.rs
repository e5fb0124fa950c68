//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

use dormant_domain::{
    DEFAULT_BATCH_SIZE, DEFAULT_OFFSET, DEFAULT_PAUSE_SECONDS, DEFAULT_RENEW_SESSION_SECONDS,
    DEFAULT_RETENTION_DAYS, RunOptions,
};
use dormant_infrastructure::DEFAULT_ACCOUNT_API_URL;

/// Drops accounts whose last login is older than the retention threshold.
#[derive(Parser, Debug)]
#[command(name = "dormant", version, about)]
pub struct CliArgs {
    /// API username.
    #[arg(short, long, env = "DORMANT_USERNAME")]
    pub username: Option<String>,

    /// API password.
    #[arg(short, long, env = "DORMANT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Seconds between forced session renewals.
    #[arg(
        short = 'r',
        long = "renewSid",
        default_value_t = DEFAULT_RENEW_SESSION_SECONDS as i64,
        allow_negative_numbers = true
    )]
    pub renew_sid: i64,

    /// JSON file with the exported user list.
    #[arg(short = 'f', long = "jsonFile")]
    pub json_file: Option<PathBuf>,

    /// Retention threshold in days.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_RETENTION_DAYS as i64,
        allow_negative_numbers = true
    )]
    pub days: i64,

    /// Number of users to process after the offset; all when omitted.
    #[arg(short = 'n', long = "numberToProcess", allow_negative_numbers = true)]
    pub number_to_process: Option<i64>,

    /// Drop calls issued before pausing.
    #[arg(
        short = 'b',
        long = "numberToProcessBeforePausing",
        default_value_t = DEFAULT_BATCH_SIZE as i64,
        allow_negative_numbers = true
    )]
    pub number_before_pausing: i64,

    /// Pause between batches, in seconds.
    #[arg(
        short = 's',
        long = "secPause",
        default_value_t = DEFAULT_PAUSE_SECONDS as i64,
        allow_negative_numbers = true
    )]
    pub sec_pause: i64,

    /// Number of leading users to skip.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_OFFSET as i64,
        allow_negative_numbers = true
    )]
    pub offset: i64,

    /// Print skipped users.
    #[arg(short = 'v', long = "verbosity")]
    pub verbosity: bool,

    /// Report users that would be dropped without dropping them.
    #[arg(short = 't', long = "testOnly")]
    pub test_only: bool,

    /// Print raw API responses.
    #[arg(long = "printResponses")]
    pub print_responses: bool,

    /// Account API endpoint.
    #[arg(long = "apiUrl", env = "DORMANT_API_URL", default_value = DEFAULT_ACCOUNT_API_URL, hide = true)]
    pub api_url: String,
}

impl CliArgs {
    /// Raw run options; normalization happens in `RunConfiguration`.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            renew_session_seconds: Some(self.renew_sid),
            retention_days: Some(self.days),
            limit: self.number_to_process,
            batch_size: Some(self.number_before_pausing),
            pause_seconds: Some(self.sec_pause),
            offset: Some(self.offset),
            verbose: self.verbosity,
            dry_run: self.test_only,
        }
    }
}
