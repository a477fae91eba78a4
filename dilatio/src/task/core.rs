use super::JoinHandle;
use crate::error::TaskFailure;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::Waker;

use tracing::warn;

/// A type-erased, single-shot unit of work.
///
/// The closure inside already captures its arguments and the completion
/// slot it reports to, so running it takes no input and yields nothing.
pub(crate) struct Job {
    run: Box<dyn FnOnce() + Send + 'static>,
}

impl Job {
    /// Wraps `f` into a job and returns the handle observing its outcome.
    ///
    /// A panic raised by `f` is caught and stored as a [`TaskFailure`]; it
    /// never unwinds into the worker thread that runs the job.
    pub(crate) fn new<F, T>(f: F) -> (Self, JoinHandle<T>)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let completion = Arc::new(Completion::new());
        let handle = JoinHandle::new(completion.clone());

        let run = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f)).map_err(TaskFailure::from_panic);

            if let Err(failure) = &outcome {
                warn!(message = failure.message(), "task panicked");
            }

            completion.complete(outcome);
        });

        (Self { run }, handle)
    }

    /// Invokes the job, consuming it.
    pub(crate) fn run(self) {
        (self.run)()
    }
}

/// Where a finished job's outcome lives until its handle claims it.
pub(crate) enum Slot<T> {
    /// The job has not finished yet.
    Empty,

    /// The outcome is available and unclaimed.
    Ready(Result<T, TaskFailure>),

    /// The outcome was handed to the handle.
    Taken,
}

pub(crate) struct CompletionState<T> {
    pub(crate) slot: Slot<T>,

    /// Wakers of tasks awaiting the handle as a future.
    pub(crate) waiters: Vec<Waker>,
}

/// One-shot rendezvous between a job and its [`JoinHandle`].
///
/// Blocking joiners park on the condition variable; async joiners register
/// a waker. Both are notified when [`complete`](Self::complete) runs.
pub(crate) struct Completion<T> {
    state: Mutex<CompletionState<T>>,
    done: Condvar,
}

impl<T> Completion<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CompletionState {
                slot: Slot::Empty,
                waiters: Vec::new(),
            }),
            done: Condvar::new(),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, CompletionState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn condvar(&self) -> &Condvar {
        &self.done
    }

    /// Stores the outcome and wakes every joiner.
    ///
    /// Called exactly once per job, by the worker that ran it.
    pub(crate) fn complete(&self, outcome: Result<T, TaskFailure>) {
        let waiters = {
            let mut state = self.lock();
            debug_assert!(matches!(state.slot, Slot::Empty), "job completed twice");

            state.slot = Slot::Ready(outcome);
            std::mem::take(&mut state.waiters)
        };

        self.done.notify_all();

        for waker in waiters {
            waker.wake();
        }
    }
}
