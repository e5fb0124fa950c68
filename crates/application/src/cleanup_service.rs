//! Cleanup driver: walks the user export once and drops dormant accounts.
//!
//! Per record, in order: session freshness, offset window, processing limit,
//! retention check, drop (or dry-run report), batch pause bookkeeping.

use std::sync::Arc;

use tracing::{info, warn};

use dormant_core::{AppError, AppResult};
use dormant_domain::{
    RetentionDecision, RetentionPolicy, RunConfiguration, SessionId, UserRecord,
};

use crate::{AccountApi, CleanupEvent, CleanupReporter, Clock, Pauser, SessionKeeper};


/// Counters describing a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Records inside the offset window.
    pub skipped: u64,
    /// Records checked against the retention policy.
    pub evaluated: u64,
    /// Evaluated records old enough to be dropped.
    pub eligible: u64,
    /// Successful drop calls.
    pub dropped: u64,
    /// Drop calls rejected by the API.
    pub failed: u64,
    /// Evaluated records kept.
    pub retained: u64,
    /// Batch pauses taken.
    pub pauses: u64,
    /// Sessions obtained while iterating.
    pub session_renewals: u64,
    /// Whether iteration stopped at the processing limit.
    pub limit_reached: bool,
}

/// Application service driving one cleanup run.
pub struct CleanupService {
    account_api: Arc<dyn AccountApi>,
    sessions: SessionKeeper,
    clock: Arc<dyn Clock>,
    pauser: Arc<dyn Pauser>,
    reporter: Arc<dyn CleanupReporter>,
    config: RunConfiguration,
}

#[derive(Debug, Default)]
struct RunCounters {
    since_offset: u64,
    since_pause: u64,
}

impl CleanupService {
    /// Creates a cleanup service.
    #[must_use]
    pub fn new(
        account_api: Arc<dyn AccountApi>,
        sessions: SessionKeeper,
        clock: Arc<dyn Clock>,
        pauser: Arc<dyn Pauser>,
        reporter: Arc<dyn CleanupReporter>,
        config: RunConfiguration,
    ) -> Self {
        Self {
            account_api,
            sessions,
            clock,
            pauser,
            reporter,
            config,
        }
    }

    /// Returns the configuration the service was built with.
    #[must_use]
    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Processes `records` in order.
    ///
    /// Drop rejections are reported and skipped. Session acquisition
    /// failures, transport failures and protocol violations abort the run.
    pub async fn run(&mut self, records: &[UserRecord]) -> AppResult<CleanupSummary> {
        let mut summary = CleanupSummary::default();
        let mut counters = RunCounters::default();
        let offset = self.config.offset;

        info!(
            records = records.len(),
            offset,
            limit = ?self.config.limit,
            dry_run = self.config.dry_run,
            "cleanup run started"
        );

        for (position, record) in (1_u64..).zip(records) {
            let fresh = self.sessions.ensure_fresh().await?;
            if fresh.renewed {
                summary.session_renewals += 1;
                self.reporter.report(&CleanupEvent::SessionRenewed {
                    session: &fresh.session,
                });
            }

            if position <= offset {
                summary.skipped += 1;
                if self.config.verbose {
                    self.reporter.report(&CleanupEvent::Skipped {
                        index: position,
                        record,
                    });
                }
                continue;
            }
            if self.config.verbose && position == offset + 1 {
                self.reporter.report(&CleanupEvent::OffsetWindowClosed);
            }

            counters.since_offset += 1;
            if let Some(limit) = self.config.limit
                && counters.since_offset > limit
            {
                summary.limit_reached = true;
                self.reporter.report(&CleanupEvent::LimitReached { limit });
                break;
            }

            self.process_record(position, record, &fresh.session, &mut counters, &mut summary)
                .await?;
            self.reporter.report(&CleanupEvent::RecordFinished);
        }

        info!(
            evaluated = summary.evaluated,
            dropped = summary.dropped,
            failed = summary.failed,
            retained = summary.retained,
            "cleanup run finished"
        );
        self.reporter
            .report(&CleanupEvent::Finished { summary: &summary });

        Ok(summary)
    }

    async fn process_record(
        &self,
        index: u64,
        record: &UserRecord,
        session: &SessionId,
        counters: &mut RunCounters,
        summary: &mut CleanupSummary,
    ) -> AppResult<()> {
        let idle_days = RetentionPolicy::days_since(record.last_login_time, self.clock.wall_now());
        summary.evaluated += 1;
        self.reporter.report(&CleanupEvent::Evaluated {
            index,
            record,
            idle_days,
        });

        if self.config.retention.decide(idle_days) == RetentionDecision::Retain {
            summary.retained += 1;
            self.reporter
                .report(&CleanupEvent::Retained { user_id: record.id });
            return Ok(());
        }

        summary.eligible += 1;
        if self.config.dry_run {
            self.reporter
                .report(&CleanupEvent::WouldDrop { user_id: record.id });
            return Ok(());
        }

        self.reporter
            .report(&CleanupEvent::Dropping { user_id: record.id });
        match self.account_api.drop_user(session, record.id).await {
            Ok(outcome) => {
                summary.dropped += 1;
                info!(user_id = %record.id, idle_days, "user dropped");
                self.reporter.report(&CleanupEvent::Dropped {
                    user_id: record.id,
                    outcome: &outcome,
                });
            }
            Err(AppError::Api(error)) => {
                summary.failed += 1;
                warn!(user_id = %record.id, error = %error, "user drop rejected");
                self.reporter.report(&CleanupEvent::DropFailed {
                    user_id: record.id,
                    error: &error,
                });
            }
            Err(error) => return Err(error),
        }

        counters.since_pause += 1;
        if counters.since_pause > self.config.batch_size {
            let duration = self.config.batch_pause;
            self.reporter
                .report(&CleanupEvent::PauseStarted { duration });
            self.pauser.pause(duration).await;
            counters.since_pause = 0;
            summary.pauses += 1;
            self.reporter.report(&CleanupEvent::PauseFinished);
        }

        Ok(())
    }
}
