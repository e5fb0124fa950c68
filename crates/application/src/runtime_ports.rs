use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    /// Monotonic instant used for session age tracking.
    fn monotonic_now(&self) -> Instant;

    /// Local wall-clock time used for login age computation.
    fn wall_now(&self) -> NaiveDateTime;
}

/// Port for the rate-limit pause between batches.
#[async_trait]
pub trait Pauser: Send + Sync {
    /// Suspends the run for `duration`.
    async fn pause(&self, duration: Duration);
}
