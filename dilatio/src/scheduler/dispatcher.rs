use super::shared::Shared;

use std::sync::{Arc, PoisonError};
use std::time::Instant;

use tracing::{debug, trace};

/// The control loop deciding when pending work becomes eligible.
///
/// The dispatcher never touches a job. It only watches the soonest deadline
/// and, once that instant has passed, wakes exactly one worker. It then
/// holds back until some worker has extracted an entry before announcing
/// the next one.
///
/// Every wait re-evaluates the state on wake-up instead of trusting a
/// deadline computed earlier, so a submission with a sooner deadline
/// preempts a timed wait on a later one.
pub(crate) struct Dispatcher {
    shared: Arc<Shared>,
}

impl Dispatcher {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Runs the dispatch loop until the scheduler is closed and empty.
    ///
    /// # States
    ///
    /// - **Idle**: nothing pending, block until a submission or shutdown
    /// - **Handoff**: a due entry was announced, block until it is taken
    /// - **Timing**: soonest deadline in the future, block until it or a
    ///   sooner submission arrives
    /// - **Ready**: soonest deadline passed, wake one worker
    /// - **Terminating**: latch closed and nothing pending, return
    pub(crate) fn run(&self) {
        let shared = &*self.shared;
        let mut state = shared.lock();

        loop {
            if state.is_finished() {
                break;
            }

            if state.announced {
                state = shared
                    .dispatch
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            }

            let Some(deadline) = state.pending.peek_soonest() else {
                state = shared
                    .dispatch
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            };

            let now = Instant::now();

            if deadline <= now {
                trace!(late = ?(now - deadline), "entry due, waking a worker");
                state.announced = true;
                shared.work.notify_one();
            } else {
                trace!(remaining = ?(deadline - now), "waiting for soonest deadline");
                state = shared
                    .dispatch
                    .wait_timeout(state, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
        }

        debug!("dispatcher exiting");
    }
}
