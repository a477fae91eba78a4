use crate::task::Job;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

/// An accepted unit of work waiting for its deadline.
pub(crate) struct PendingEntry {
    /// Earliest instant at which the job may start.
    pub(crate) deadline: Instant,

    /// Insertion counter, only used to make the heap order total.
    seq: u64,

    pub(crate) job: Job,
}

impl Eq for PendingEntry {}

impl PartialEq for PendingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Ord for PendingEntry {
    /// Orders entries by deadline, then by insertion.
    ///
    /// The comparison is **reversed** so that a `BinaryHeap<PendingEntry>`
    /// behaves as a min-heap and the soonest deadline sits on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Accepted-but-not-started jobs, ordered by deadline.
///
/// The set is never shared on its own: it lives inside the scheduler state
/// and every access happens under the scheduler lock, which is what makes a
/// `peek_soonest` followed by `extract_soonest` atomic.
pub(crate) struct PendingSet {
    heap: BinaryHeap<PendingEntry>,
    next_seq: u64,
}

impl PendingSet {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Inserts a job. `O(log n)`.
    pub(crate) fn insert(&mut self, deadline: Instant, job: Job) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);

        self.heap.push(PendingEntry { deadline, seq, job });
    }

    /// Returns the soonest deadline, or `None` when empty.
    pub(crate) fn peek_soonest(&self) -> Option<Instant> {
        self.heap.peek().map(|entry| entry.deadline)
    }

    /// Removes and returns the entry with the soonest deadline.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty; callers check emptiness first under the
    /// same lock.
    pub(crate) fn extract_soonest(&mut self) -> PendingEntry {
        self.heap
            .pop()
            .expect("extract_soonest called on an empty pending set")
    }

    /// Returns `true` if the soonest entry's deadline has passed at `now`.
    pub(crate) fn has_due(&self, now: Instant) -> bool {
        self.peek_soonest().is_some_and(|deadline| deadline <= now)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
