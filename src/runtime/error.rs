//! Errors surfaced by scheduler handles.

use thiserror::Error;

/// Errors that can occur when talking to a running scheduler.
///
/// The scheduler itself never fails: reducers are total and effect failures
/// travel as events. These errors only describe the channel to it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Scheduler '{name}' has stopped")]
    Stopped { name: String },

    #[error("Scheduler '{name}' inbox is full")]
    Full { name: String },
}
