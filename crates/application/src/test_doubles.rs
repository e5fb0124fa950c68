//! In-memory port implementations shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use dormant_core::{ApiError, AppError, AppResult};
use dormant_domain::{Credentials, SessionId, UserId, UserRecord};

use crate::{AccountApi, CleanupEvent, CleanupReporter, Clock, DropOutcome, Pauser};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn reference_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 15)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .unwrap_or_else(|| panic!("invalid reference date"))
}

/// Builds a record whose last login is `idle_days` before [`reference_now`].
pub fn record(id: i64, idle_days: i64) -> UserRecord {
    UserRecord {
        id: UserId::new(id),
        email: format!("user{id}@example.edu"),
        first_name: Some("Test".to_owned()),
        last_name: Some(format!("User {id}")),
        last_login_time: reference_now() - chrono::Duration::days(idle_days),
        setup_time: None,
        is_disabled: false,
        is_admin: false,
        time_zone: Some("America/New_York".to_owned()),
    }
}

pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
    wall: NaiveDateTime,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
            wall: reference_now(),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut offset = lock(&self.offset);
        *offset += by;
    }
}

impl Clock for ManualClock {
    fn monotonic_now(&self) -> Instant {
        self.base + *lock(&self.offset)
    }

    fn wall_now(&self) -> NaiveDateTime {
        self.wall
    }
}

#[derive(Default)]
struct ApiState {
    logins: u64,
    login_rejection: Option<ApiError>,
    drop_rejections: HashMap<UserId, ApiError>,
    drop_failures: HashMap<UserId, String>,
    drop_calls: Vec<(String, UserId)>,
}

/// Account API that hands out `sid-1`, `sid-2`, ... and records drop calls.
#[derive(Default)]
pub struct ScriptedAccountApi {
    state: Mutex<ApiState>,
    drop_latency: Option<(Arc<ManualClock>, Duration)>,
}

impl ScriptedAccountApi {
    /// Every drop call advances `clock` by `latency`.
    pub fn with_drop_latency(clock: Arc<ManualClock>, latency: Duration) -> Self {
        Self {
            state: Mutex::new(ApiState::default()),
            drop_latency: Some((clock, latency)),
        }
    }

    pub fn reject_logins(&self, error: ApiError) {
        lock(&self.state).login_rejection = Some(error);
    }

    pub fn reject_drop(&self, user_id: i64, error: ApiError) {
        lock(&self.state)
            .drop_rejections
            .insert(UserId::new(user_id), error);
    }

    pub fn fail_drop_transport(&self, user_id: i64, message: &str) {
        lock(&self.state)
            .drop_failures
            .insert(UserId::new(user_id), message.to_owned());
    }

    pub fn login_count(&self) -> u64 {
        lock(&self.state).logins
    }

    pub fn dropped_ids(&self) -> Vec<i64> {
        lock(&self.state)
            .drop_calls
            .iter()
            .map(|(_, user_id)| user_id.as_i64())
            .collect()
    }

    pub fn drop_sessions(&self) -> Vec<String> {
        lock(&self.state)
            .drop_calls
            .iter()
            .map(|(session, _)| session.clone())
            .collect()
    }
}

#[async_trait]
impl AccountApi for ScriptedAccountApi {
    async fn login(&self, _credentials: &Credentials) -> AppResult<SessionId> {
        let mut state = lock(&self.state);
        if let Some(error) = state.login_rejection.clone() {
            return Err(AppError::Api(error));
        }

        state.logins += 1;
        SessionId::new(format!("sid-{}", state.logins))
    }

    async fn drop_user(&self, session: &SessionId, user_id: UserId) -> AppResult<DropOutcome> {
        if let Some((clock, latency)) = &self.drop_latency {
            clock.advance(*latency);
        }

        let mut state = lock(&self.state);
        state
            .drop_calls
            .push((session.as_str().to_owned(), user_id));

        if let Some(message) = state.drop_failures.get(&user_id) {
            return Err(AppError::Transport(message.clone()));
        }
        if let Some(error) = state.drop_rejections.get(&user_id) {
            return Err(AppError::Api(error.clone()));
        }

        Ok(DropOutcome {
            message: Some(format!("User {user_id} dropped")),
        })
    }
}

#[derive(Default)]
pub struct RecordingPauser {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPauser {
    pub fn pauses(&self) -> Vec<Duration> {
        lock(&self.pauses).clone()
    }
}

#[async_trait]
impl Pauser for RecordingPauser {
    async fn pause(&self, duration: Duration) {
        lock(&self.pauses).push(duration);
    }
}

/// Reporter that flattens events into short labels such as `drop:3`.
#[derive(Default)]
pub struct RecordingReporter {
    labels: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn labels(&self) -> Vec<String> {
        lock(&self.labels).clone()
    }

    /// Labels without session and record separator noise.
    pub fn actions(&self) -> Vec<String> {
        self.labels()
            .into_iter()
            .filter(|label| label != "end" && !label.starts_with("session:"))
            .collect()
    }
}

impl CleanupReporter for RecordingReporter {
    fn report(&self, event: &CleanupEvent<'_>) {
        let label = match event {
            CleanupEvent::SessionRenewed { session } => format!("session:{session}"),
            CleanupEvent::Skipped { index, .. } => format!("skip:{index}"),
            CleanupEvent::OffsetWindowClosed => "offset-closed".to_owned(),
            CleanupEvent::LimitReached { limit } => format!("limit:{limit}"),
            CleanupEvent::Evaluated {
                record, idle_days, ..
            } => format!("evaluate:{}:{idle_days}", record.id),
            CleanupEvent::WouldDrop { user_id } => format!("would-drop:{user_id}"),
            CleanupEvent::Dropping { user_id } => format!("drop:{user_id}"),
            CleanupEvent::Dropped { user_id, .. } => format!("dropped:{user_id}"),
            CleanupEvent::DropFailed { user_id, error } => {
                format!("drop-failed:{user_id}:{}", error.status())
            }
            CleanupEvent::Retained { user_id } => format!("retain:{user_id}"),
            CleanupEvent::PauseStarted { .. } => "pause".to_owned(),
            CleanupEvent::PauseFinished => "resume".to_owned(),
            CleanupEvent::RecordFinished => "end".to_owned(),
            CleanupEvent::Finished { .. } => "finished".to_owned(),
        };
        lock(&self.labels).push(label);
    }
}
