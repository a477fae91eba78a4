//! Error types for the scheduler.
//!
//! Two families of failure exist and they travel on different paths:
//! - [`Error`] is returned synchronously by construction and submission,
//! - [`TaskFailure`] is produced while a unit of work runs and is only ever
//!   observed through that unit's [`JoinHandle`](crate::task::JoinHandle).

use std::any::Any;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Errors returned by scheduler construction and submission.
#[derive(Debug, Error)]
pub enum Error {
    /// The scheduler was configured with no worker threads.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// The operating system refused to spawn one of the scheduler threads.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: io::Error,
    },

    /// The resolved target time was not strictly in the future.
    #[error("target time is not in the future (late by {late:?})")]
    SubmissionRejected { late: Duration },

    /// A relative delay could not be represented as a monotonic instant.
    #[error("delay overflows the monotonic clock")]
    DeadlineOverflow,

    /// The scheduler has begun draining and no longer accepts work.
    #[error("scheduler is closed to new submissions")]
    SchedulerClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A unit of work panicked while executing.
///
/// The panic is caught on the worker thread, so neither the worker nor any
/// other pending unit is affected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task panicked: {message}")]
pub struct TaskFailure {
    message: String,
}

impl TaskFailure {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };

        Self { message }
    }

    /// The panic message, when the payload was a string.
    pub fn message(&self) -> &str {
        &self.message
    }
}
