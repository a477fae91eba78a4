use super::Scheduler;
use crate::error::Result;

use std::thread;

/// Builder for configuring and creating a [`Scheduler`].
///
/// # Examples
///
/// ```rust,ignore
/// let scheduler = SchedulerBuilder::new()
///     .worker_threads(4)
///     .thread_name("jobs")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SchedulerBuilder {
    /// Number of worker threads.
    pub(crate) worker_threads: usize,

    /// Prefix for the names of spawned threads.
    pub(crate) thread_name: String,

    /// Stack size for spawned threads, platform default if `None`.
    pub(crate) stack_size: Option<usize>,
}

impl SchedulerBuilder {
    /// Creates a new `SchedulerBuilder` with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: "dilatio".to_owned(),
            stack_size: None,
        }
    }

    /// Sets the number of worker threads.
    ///
    /// Zero is accepted here and rejected by [`build`](Self::build).
    pub fn worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = n;
        self
    }

    /// Sets the prefix used to name the dispatcher and worker threads.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Sets the stack size, in bytes, of every spawned thread.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Builds the scheduler, spawning its dispatcher and worker threads.
    ///
    /// # Errors
    ///
    /// - [`Error::ZeroWorkers`](crate::Error::ZeroWorkers) if no worker was
    ///   requested.
    /// - [`Error::Spawn`](crate::Error::Spawn) if a thread could not be
    ///   spawned. Threads already started are joined first.
    pub fn build(self) -> Result<Scheduler> {
        Scheduler::start(&self)
    }

    pub(crate) fn thread(&self, name: String) -> thread::Builder {
        let builder = thread::Builder::new().name(name);

        match self.stack_size {
            Some(size) => builder.stack_size(size),
            None => builder,
        }
    }
}

impl Default for SchedulerBuilder {
    /// Creates a default `SchedulerBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
