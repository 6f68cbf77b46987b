//! Scheduler error types.

use thiserror::Error;

/// Errors raised while setting up the scheduler. Nothing fails once it
/// is running.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no endpoints to schedule")]
    NoEndpoints,

    #[error("max concurrent instances must be at least 1, got {0}")]
    InvalidConcurrencyCap(usize),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;
