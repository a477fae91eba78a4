//! Target-time resolution.
//!
//! Submissions accept either an absolute monotonic [`Instant`] or a
//! [`Duration`] relative to the moment of submission. Both are folded into
//! [`When`] and resolved against the clock exactly once.

use crate::error::{Error, Result};

use std::time::{Duration, Instant};

/// The point in time a unit of work becomes eligible to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    /// An absolute instant on the monotonic clock.
    At(Instant),

    /// A delay measured from the moment of submission.
    After(Duration),
}

impl When {
    /// Resolves this target against `now`, producing an absolute deadline.
    ///
    /// The deadline must lie strictly after `now`; anything at or before it
    /// is rejected with [`Error::SubmissionRejected`].
    pub(crate) fn resolve(self, now: Instant) -> Result<Instant> {
        let deadline = match self {
            When::At(instant) => instant,
            When::After(delay) => now.checked_add(delay).ok_or(Error::DeadlineOverflow)?,
        };

        if deadline <= now {
            return Err(Error::SubmissionRejected {
                late: now.duration_since(deadline),
            });
        }

        Ok(deadline)
    }
}

impl From<Instant> for When {
    fn from(instant: Instant) -> Self {
        When::At(instant)
    }
}

impl From<Duration> for When {
    fn from(delay: Duration) -> Self {
        When::After(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_delay_is_added_to_now() {
        let now = Instant::now();
        let deadline = When::After(Duration::from_millis(25)).resolve(now).unwrap();
        assert_eq!(deadline, now + Duration::from_millis(25));
    }

    #[test]
    fn test_absolute_future_instant_is_kept() {
        let now = Instant::now();
        let target = now + Duration::from_secs(1);
        assert_eq!(When::At(target).resolve(now).unwrap(), target);
    }

    #[test]
    fn test_now_is_rejected() {
        let now = Instant::now();
        assert!(matches!(
            When::At(now).resolve(now),
            Err(Error::SubmissionRejected { late }) if late == Duration::ZERO
        ));
    }

    #[test]
    fn test_zero_delay_is_rejected() {
        let now = Instant::now();
        assert!(matches!(
            When::After(Duration::ZERO).resolve(now),
            Err(Error::SubmissionRejected { .. })
        ));
    }

    #[test]
    fn test_past_instant_reports_lateness() {
        let now = Instant::now() + Duration::from_millis(50);
        let past = now - Duration::from_millis(20);

        match When::At(past).resolve(now) {
            Err(Error::SubmissionRejected { late }) => {
                assert_eq!(late, Duration::from_millis(20));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_delay() {
        let now = Instant::now();
        assert!(matches!(
            When::After(Duration::MAX).resolve(now),
            Err(Error::DeadlineOverflow)
        ));
    }

    #[test]
    fn test_conversions() {
        let instant = Instant::now();
        assert_eq!(When::from(instant), When::At(instant));
        assert_eq!(
            When::from(Duration::from_millis(3)),
            When::After(Duration::from_millis(3))
        );
    }
}
