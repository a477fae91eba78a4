use super::shared::Shared;
use crate::task::Job;

use std::cell::Cell;
use std::ptr;
use std::sync::{Arc, PoisonError};
use std::time::Instant;

use tracing::{debug, trace};

thread_local! {
    /// Scheduler state the current thread works for, null outside workers.
    static CURRENT_SCHEDULER: Cell<*const Shared> = const { Cell::new(ptr::null()) };
}

/// Returns `true` if the calling thread is one of `shared`'s workers.
///
/// Workers only run foreign code inside a job, so this also means the
/// caller is a job counted in `in_flight`.
pub(crate) fn is_worker_of(shared: &Shared) -> bool {
    CURRENT_SCHEDULER.with(|current| ptr::eq(current.get(), shared))
}

/// A worker thread in the scheduler.
///
/// A worker sleeps until the soonest pending entry is due, extracts it
/// under the lock, runs it with the lock released, then reports back so
/// drain callers can observe completion.
pub(crate) struct Worker {
    /// Identifier of the worker, used for logging.
    id: usize,

    shared: Arc<Shared>,
}

impl Worker {
    pub(crate) fn new(id: usize, shared: Arc<Shared>) -> Self {
        Self { id, shared }
    }

    /// Runs the worker loop until the scheduler is closed and empty.
    pub(crate) fn run(&self) {
        CURRENT_SCHEDULER.with(|current| current.set(Arc::as_ptr(&self.shared)));

        while let Some(job) = self.next_job() {
            job.run();
            self.finish_job();
        }

        debug!(worker = self.id, "worker exiting");
    }

    /// Blocks until a due job can be taken, or returns `None` on shutdown.
    ///
    /// The predicate is re-checked on every wake: another worker may have
    /// taken the entry this one was woken for, in which case it goes back
    /// to sleep.
    fn next_job(&self) -> Option<Job> {
        let shared = &*self.shared;
        let mut state = shared.lock();

        loop {
            if state.pending.has_due(Instant::now()) {
                break;
            }

            if state.is_finished() {
                return None;
            }

            state = shared
                .work
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        let entry = state.pending.extract_soonest();
        state.announced = false;
        state.in_flight += 1;
        drop(state);

        shared.dispatch.notify_one();

        trace!(
            worker = self.id,
            late = ?entry.deadline.elapsed(),
            "running job"
        );

        Some(entry.job)
    }

    fn finish_job(&self) {
        let mut state = self.shared.lock();
        state.in_flight -= 1;

        if state.is_drained() {
            self.shared.drained.notify_all();
        }
    }
}
