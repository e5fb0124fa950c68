use std::time::Duration;

use dormant_core::ApiError;
use dormant_domain::{SessionId, UserId, UserRecord};

use crate::{CleanupSummary, DropOutcome};

/// Progress events emitted by the cleanup driver, in emission order.
#[derive(Debug)]
pub enum CleanupEvent<'a> {
    /// A new session was obtained.
    SessionRenewed {
        /// The fresh session token.
        session: &'a SessionId,
    },
    /// A record inside the offset window was skipped. Only emitted when
    /// verbose output is enabled.
    Skipped {
        /// 1-based position in the input.
        index: u64,
        /// The skipped record.
        record: &'a UserRecord,
    },
    /// The offset window closed; emitted once, only when verbose.
    OffsetWindowClosed,
    /// The processing limit was exceeded and iteration stopped.
    LimitReached {
        /// The configured limit.
        limit: u64,
    },
    /// A record was checked against the retention policy.
    Evaluated {
        /// 1-based position in the input.
        index: u64,
        /// The evaluated record.
        record: &'a UserRecord,
        /// Whole days since the last login.
        idle_days: i64,
    },
    /// Dry run: the record would have been dropped.
    WouldDrop {
        /// The eligible record.
        user_id: UserId,
    },
    /// A drop call is about to be issued.
    Dropping {
        /// The user being dropped.
        user_id: UserId,
    },
    /// The drop call succeeded.
    Dropped {
        /// The dropped user.
        user_id: UserId,
        /// The API response.
        outcome: &'a DropOutcome,
    },
    /// The drop call was rejected by the API.
    DropFailed {
        /// The user that could not be dropped.
        user_id: UserId,
        /// The rejection.
        error: &'a ApiError,
    },
    /// The record stays.
    Retained {
        /// The retained user.
        user_id: UserId,
    },
    /// A batch pause starts.
    PauseStarted {
        /// Length of the pause.
        duration: Duration,
    },
    /// The batch pause is over.
    PauseFinished,
    /// All output for the current record has been emitted.
    RecordFinished,
    /// The run completed.
    Finished {
        /// Counters for the whole run.
        summary: &'a CleanupSummary,
    },
}

/// Port receiving driver progress.
pub trait CleanupReporter: Send + Sync {
    /// Handles one progress event.
    fn report(&self, event: &CleanupEvent<'_>);
}
