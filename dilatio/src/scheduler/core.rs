use super::builder::SchedulerBuilder;
use super::dispatcher::Dispatcher;
use super::shared::Shared;
use super::worker::Worker;
use crate::error::{Error, Result};
use crate::task::{Job, JoinHandle};
use crate::time::When;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

/// A delayed-execution engine.
///
/// `Scheduler` owns:
/// - the shared state (pending jobs, shutdown latch, condition variables),
/// - one dispatcher thread that tracks the soonest deadline,
/// - a fixed pool of worker threads that run jobs once they are due.
///
/// A job never starts before its deadline. Among due jobs, the one with the
/// earliest deadline is always handed out first.
///
/// Dropping the scheduler drains it (see [`wait`](Self::wait)) and joins
/// every thread it spawned.
///
/// # Examples
///
/// ```rust,ignore
/// let scheduler = Scheduler::new(2)?;
///
/// let handle = scheduler.run_after(Duration::from_millis(10), || 6 * 7)?;
/// assert_eq!(handle.join().unwrap(), 42);
///
/// scheduler.wait();
/// ```
pub struct Scheduler {
    shared: Arc<Shared>,

    /// Join handle for the dispatcher thread.
    dispatcher: Option<thread::JoinHandle<()>>,

    /// Join handles for worker threads.
    workers: Vec<thread::JoinHandle<()>>,
}

impl Scheduler {
    /// Creates a scheduler with `worker_threads` workers and default settings.
    ///
    /// Equivalent to `SchedulerBuilder::new().worker_threads(n).build()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroWorkers`] if `worker_threads == 0`.
    pub fn new(worker_threads: usize) -> Result<Self> {
        SchedulerBuilder::new().worker_threads(worker_threads).build()
    }

    /// Returns a builder for a customised scheduler.
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    /// Spawns the dispatcher and the workers described by `builder`.
    pub(crate) fn start(builder: &SchedulerBuilder) -> Result<Self> {
        if builder.worker_threads == 0 {
            return Err(Error::ZeroWorkers);
        }

        let mut scheduler = Self {
            shared: Arc::new(Shared::new()),
            dispatcher: None,
            workers: Vec::with_capacity(builder.worker_threads),
        };

        let dispatcher = Dispatcher::new(scheduler.shared.clone());
        let handle = builder
            .thread(format!("{}-dispatcher", builder.thread_name))
            .spawn(move || dispatcher.run())
            .map_err(|source| Error::Spawn {
                role: "dispatcher",
                source,
            })?;
        scheduler.dispatcher = Some(handle);

        for id in 0..builder.worker_threads {
            let worker = Worker::new(id, scheduler.shared.clone());

            // On failure, dropping `scheduler` drains and joins what was
            // already spawned.
            let handle = builder
                .thread(format!("{}-worker-{id}", builder.thread_name))
                .spawn(move || worker.run())
                .map_err(|source| Error::Spawn {
                    role: "worker",
                    source,
                })?;

            scheduler.workers.push(handle);
        }

        debug!(workers = builder.worker_threads, "scheduler started");

        Ok(scheduler)
    }

    /// Submits `f` to run no earlier than `when`.
    ///
    /// `when` is either an absolute [`Instant`] or a [`Duration`] measured
    /// from now. The returned handle yields `f`'s return value, or a
    /// [`TaskFailure`](crate::TaskFailure) if `f` panics.
    ///
    /// # Errors
    ///
    /// - [`Error::SchedulerClosed`] once [`wait`](Self::wait) has begun.
    /// - [`Error::SubmissionRejected`] if the target time is not strictly
    ///   in the future.
    /// - [`Error::DeadlineOverflow`] if the delay cannot be represented.
    ///
    /// Nothing is queued when an error is returned.
    pub fn submit<W, F, T>(&self, when: W, f: F) -> Result<JoinHandle<T>>
    where
        W: Into<When>,
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (job, handle) = Job::new(f);
        let deadline = self.shared.submit(when.into(), job)?;

        let delay = deadline.saturating_duration_since(Instant::now());
        trace!(?delay, "job accepted");

        Ok(handle)
    }

    /// Submits `f` to run no earlier than the instant `when`.
    pub fn run_at<F, T>(&self, when: Instant, f: F) -> Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit(When::At(when), f)
    }

    /// Submits `f` to run once `delay` has elapsed from now.
    pub fn run_after<F, T>(&self, delay: Duration, f: F) -> Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit(When::After(delay), f)
    }

    /// Stops accepting work and blocks until every accepted job has run.
    ///
    /// Idempotent and callable from any thread: the first call closes the
    /// scheduler, and every call returns once nothing is pending or running.
    /// Submissions made afterwards fail with [`Error::SchedulerClosed`].
    pub fn wait(&self) {
        self.shared.drain();
    }

    /// Number of accepted jobs that have not started yet.
    pub fn pending(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// Returns `true` once [`wait`](Self::wait) has been called.
    pub fn is_closed(&self) -> bool {
        !self.shared.lock().accepting
    }

    /// Number of worker threads.
    pub fn worker_threads(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for Scheduler {
    /// Shuts down the scheduler.
    ///
    /// This performs the following steps:
    /// 1. Drains accepted work, closing the scheduler if still open
    /// 2. Joins the dispatcher thread
    /// 3. Joins all worker threads, except the calling one when the last
    ///    owner is dropped from inside a job; that worker exits on its own
    ///    once the job returns
    fn drop(&mut self) {
        self.shared.drain();

        if let Some(handle) = self.dispatcher.take() {
            let _ = handle.join();
        }

        let current = thread::current().id();
        for handle in self.workers.drain(..) {
            if handle.thread().id() != current {
                let _ = handle.join();
            }
        }
    }
}
