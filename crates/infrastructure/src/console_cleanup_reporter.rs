//! Console progress output for cleanup runs.

use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::Mutex;

use dormant_application::{CleanupEvent, CleanupReporter, CleanupSummary};
use dormant_domain::{RunConfiguration, SessionId};

/// Writes human-readable progress lines for every cleanup event.
pub struct ConsoleCleanupReporter<W: Write + Send = Stdout> {
    out: Mutex<W>,
}

impl ConsoleCleanupReporter<Stdout> {
    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleCleanupReporter<W> {
    /// Creates a reporter writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Prints the run banner with the effective configuration.
    pub fn banner(&self, config: &RunConfiguration) {
        let limit = config
            .limit
            .map_or_else(|| "All".to_owned(), |limit| limit.to_string());
        let offset = match config.offset {
            0 => "None".to_owned(),
            offset => offset.to_string(),
        };

        self.write(&format!(
            "\nAccount Cleanup\n=============================\n\n\
             Days last login check: {days}\n\
             Number per batch before pausing: {batch}\n\
             Number to process in total: {limit}\n\
             User list offset: {offset}\n\
             Show offsets: {verbose}\n\
             Test only: {dry_run}\n\n",
            days = config.retention.threshold_days(),
            batch = config.batch_size,
            verbose = yes_no(config.verbose),
            dry_run = yes_no(config.dry_run),
        ));
    }

    /// Prints the session obtained while checking credentials.
    pub fn session_opened(&self, session: &SessionId) {
        self.write(&format!("SID: {session}\n"));
    }

    /// Prints the selected input file and the section header.
    pub fn input_selected(&self, path: &Path, config: &RunConfiguration) {
        self.write(&format!(
            "File: {}\n\n\
             Check for user logins >/= {} days\n\
             ---------------------------------------\n\n",
            path.display(),
            config.retention.threshold_days()
        ));
    }

    fn write(&self, text: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Write errors are ignored.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl<W: Write + Send> CleanupReporter for ConsoleCleanupReporter<W> {
    fn report(&self, event: &CleanupEvent<'_>) {
        self.write(&render(event));
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn render(event: &CleanupEvent<'_>) -> String {
    match event {
        CleanupEvent::SessionRenewed { session } => format!("RENEWED SID: {session}\n\n"),
        CleanupEvent::Skipped { index, record } => {
            format!("{index}) SKIPPING User: ({}) {}\n", record.id, record.email)
        }
        CleanupEvent::OffsetWindowClosed | CleanupEvent::RecordFinished => "\n".to_owned(),
        CleanupEvent::LimitReached { limit } => {
            format!("Reached the limit of {limit} users to process.\n")
        }
        CleanupEvent::Evaluated {
            index,
            record,
            idle_days,
        } => format!(
            "{index}) User: ({}) {}\nLast login: {}\n{idle_days} days since last login\n",
            record.id,
            record.email,
            record.last_login_display()
        ),
        CleanupEvent::WouldDrop { .. } => "** WILL BE DROPPED **\n".to_owned(),
        CleanupEvent::Dropping { user_id } => format!("DROPPING {user_id} ... "),
        CleanupEvent::Dropped { outcome, .. } => match &outcome.message {
            Some(message) => format!("Done\n    {message}!\n"),
            None => "Done\n".to_owned(),
        },
        CleanupEvent::DropFailed { error, .. } => format!("Done\n    ERROR: {error}\n"),
        CleanupEvent::Retained { .. } => "RETAIN\n".to_owned(),
        CleanupEvent::PauseStarted { .. } => "\nPausing ... ".to_owned(),
        CleanupEvent::PauseFinished => "Done\n".to_owned(),
        CleanupEvent::Finished { summary } => render_summary(summary),
    }
}

fn render_summary(summary: &CleanupSummary) -> String {
    format!(
        "\nSummary\n-------\n\
         Skipped (offset): {}\n\
         Evaluated: {}\n\
         Eligible for drop: {}\n\
         Dropped: {}\n\
         Failed: {}\n\
         Retained: {}\n\
         Batch pauses: {}\n\
         Session renewals: {}\n",
        summary.skipped,
        summary.evaluated,
        summary.eligible,
        summary.dropped,
        summary.failed,
        summary.retained,
        summary.pauses,
        summary.session_renewals,
    )
}
