//! Clock and pause adapters backed by the operating system and tokio.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use tracing::debug;

use dormant_application::{Clock, Pauser};

/// System clock; wall time is local, like the timestamps in the export.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn monotonic_now(&self) -> Instant {
        Instant::now()
    }

    fn wall_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Pauses with `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPauser;

#[async_trait]
impl Pauser for TokioPauser {
    async fn pause(&self, duration: Duration) {
        debug!(
            pause_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "pausing between batches"
        );
        tokio::time::sleep(duration).await;
    }
}
