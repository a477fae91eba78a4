use super::pending::PendingSet;
use super::worker;
use crate::error::{Error, Result};
use crate::task::Job;
use crate::time::When;

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::debug;

/// Everything guarded by the scheduler lock.
pub(crate) struct State {
    /// Shutdown latch. Starts `true`, flips to `false` once, never back.
    pub(crate) accepting: bool,

    /// Accepted jobs that no worker has taken yet.
    pub(crate) pending: PendingSet,

    /// The dispatcher signalled a worker for a due entry that has not been
    /// extracted yet.
    pub(crate) announced: bool,

    /// Jobs extracted by a worker and still running.
    pub(crate) in_flight: usize,

    /// Running jobs that are themselves blocked in a drain.
    pub(crate) draining_jobs: usize,
}

impl State {
    /// Nothing left to run, and every running job is waiting on the drain.
    pub(crate) fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.in_flight == self.draining_jobs
    }

    /// The latch is closed and no entry remains for anyone to pick up.
    pub(crate) fn is_finished(&self) -> bool {
        !self.accepting && self.pending.is_empty()
    }
}

/// State shared by the scheduler facade, the dispatcher and the workers.
///
/// One mutex guards [`State`]; three condition variables hang off it:
/// - `dispatch` wakes the dispatcher (new submission, extraction, shutdown),
/// - `work` wakes a worker (an entry became due, or shutdown),
/// - `drained` wakes drain callers (no job pending or running).
pub(crate) struct Shared {
    state: Mutex<State>,

    pub(crate) dispatch: Condvar,
    pub(crate) work: Condvar,
    pub(crate) drained: Condvar,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                accepting: true,
                pending: PendingSet::new(),
                announced: false,
                in_flight: 0,
                draining_jobs: 0,
            }),
            dispatch: Condvar::new(),
            work: Condvar::new(),
            drained: Condvar::new(),
        }
    }

    /// Locks the scheduler state.
    ///
    /// Jobs never run under this lock, so poisoning can only come from a
    /// panic between two consistent updates; the state is still usable.
    pub(crate) fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accepts `job` for execution at `when`.
    ///
    /// Fails without touching the state if the latch is closed or the target
    /// does not lie strictly in the future.
    pub(crate) fn submit(&self, when: When, job: Job) -> Result<Instant> {
        let mut state = self.lock();

        if !state.accepting {
            return Err(Error::SchedulerClosed);
        }

        let deadline = when.resolve(Instant::now())?;
        state.pending.insert(deadline, job);
        drop(state);

        self.dispatch.notify_one();

        Ok(deadline)
    }

    /// Closes the latch and blocks until every accepted job has run.
    ///
    /// Only the first caller flips the latch; every caller, concurrent or
    /// later, waits on the same drain condition. Once drained, the
    /// dispatcher and all workers are woken so they can observe shutdown.
    ///
    /// A job draining its own scheduler does not wait for itself: it is
    /// counted in `draining_jobs` for as long as it blocks here.
    pub(crate) fn drain(&self) {
        let in_job = worker::is_worker_of(self);
        let mut state = self.lock();

        if state.accepting {
            state.accepting = false;
            debug!(pending = state.pending.len(), "scheduler closed, draining");
        }

        if in_job {
            state.draining_jobs += 1;

            if state.is_drained() {
                self.drained.notify_all();
            }
        }

        let mut state = self
            .drained
            .wait_while(state, |s| !s.is_drained())
            .unwrap_or_else(PoisonError::into_inner);

        if in_job {
            state.draining_jobs -= 1;
        }
        drop(state);

        self.dispatch.notify_all();
        self.work.notify_all();
    }
}
