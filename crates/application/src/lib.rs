//! Application services and ports.

#![forbid(unsafe_code)]

mod account_ports;
mod cleanup_reporter;
mod cleanup_service;
mod runtime_ports;
mod session_keeper;

#[cfg(test)]
mod test_doubles;

pub use account_ports::{AccountApi, DropOutcome};
pub use cleanup_reporter::{CleanupEvent, CleanupReporter};
pub use cleanup_service::{CleanupService, CleanupSummary};
pub use runtime_ports::{Clock, Pauser};
pub use session_keeper::{FreshSession, SessionKeeper};
