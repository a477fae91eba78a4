use super::core::Slot;
use super::Completion;
use crate::error::TaskFailure;

use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

const ALREADY_TAKEN: &str = "JoinHandle polled after completion";

/// A handle to a submitted unit of work.
///
/// The handle delivers the unit's outcome exactly once: either the value
/// returned by the closure, or a [`TaskFailure`] if it panicked. It can be
/// consumed by blocking ([`join`](Self::join),
/// [`join_timeout`](Self::join_timeout)) or awaited as a [`Future`] from any
/// executor.
///
/// Dropping a `JoinHandle` does **not** cancel the unit of work; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    completion: Arc<Completion<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(completion: Arc<Completion<T>>) -> Self {
        Self { completion }
    }

    /// Returns `true` once the unit of work has finished running.
    pub fn is_finished(&self) -> bool {
        !matches!(self.completion.lock().slot, Slot::Empty)
    }

    /// Blocks the current thread until the unit of work finishes.
    ///
    /// # Panics
    ///
    /// Panics if the handle was already polled to completion as a future.
    pub fn join(self) -> Result<T, TaskFailure> {
        let mut state = self.completion.lock();

        loop {
            match std::mem::replace(&mut state.slot, Slot::Taken) {
                Slot::Ready(outcome) => return outcome,
                Slot::Empty => {
                    state.slot = Slot::Empty;
                    state = self
                        .completion
                        .condvar()
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                Slot::Taken => panic!("{ALREADY_TAKEN}"),
            }
        }
    }

    /// Blocks for at most `timeout` waiting for the unit of work.
    ///
    /// On timeout the handle is given back so the caller can keep waiting
    /// later. The unit of work itself is unaffected.
    ///
    /// # Panics
    ///
    /// Panics if the handle was already polled to completion as a future.
    pub fn join_timeout(self, timeout: Duration) -> Result<Result<T, TaskFailure>, Self> {
        let outcome = {
            let state = self.completion.lock();
            let (mut state, _) = self
                .completion
                .condvar()
                .wait_timeout_while(state, timeout, |s| matches!(s.slot, Slot::Empty))
                .unwrap_or_else(PoisonError::into_inner);

            match std::mem::replace(&mut state.slot, Slot::Taken) {
                Slot::Ready(outcome) => Some(outcome),
                Slot::Empty => {
                    state.slot = Slot::Empty;
                    None
                }
                Slot::Taken => panic!("{ALREADY_TAKEN}"),
            }
        };

        outcome.ok_or(self)
    }
}

impl<T> Future for JoinHandle<T> {
    /// The outcome of the unit of work.
    type Output = Result<T, TaskFailure>;

    /// Polls the join handle.
    ///
    /// The waker is registered under the same lock the worker takes to
    /// publish the outcome, so a completion racing with this poll is never
    /// missed.
    ///
    /// # Panics
    ///
    /// Panics if polled again after it has returned `Poll::Ready`. The same
    /// holds for [`join`](Self::join) and [`join_timeout`](Self::join_timeout)
    /// once the outcome has been taken this way.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.completion.lock();

        match std::mem::replace(&mut state.slot, Slot::Taken) {
            Slot::Ready(outcome) => Poll::Ready(outcome),
            Slot::Empty => {
                state.slot = Slot::Empty;

                let waker = cx.waker();
                if !state.waiters.iter().any(|w| w.will_wake(waker)) {
                    state.waiters.push(waker.clone());
                }

                Poll::Pending
            }
            Slot::Taken => panic!("{ALREADY_TAKEN}"),
        }
    }
}

impl<T> fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}
