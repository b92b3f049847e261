//! Outstanding contributions ordered oldest-first
//!
//! A min-heap keyed by `(timestamp, sequence)`. The sequence is an insertion
//! counter, so contributions sharing a timestamp come out in the order they
//! were recorded.
//!
//! The running total is kept as `i128`: the sum of any prefix of
//! `i64` contributions fits, so popping in time order cannot overflow.

use crate::types::Contribution;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Contribution tagged with its insertion sequence
#[derive(Debug, Clone)]
pub(crate) struct QueuedContribution {
    sequence: u64,
    pub(crate) contribution: Contribution,
}

impl QueuedContribution {
    fn key(&self) -> (chrono::DateTime<chrono::Utc>, u64) {
        (self.contribution.timestamp, self.sequence)
    }
}

impl PartialEq for QueuedContribution {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueuedContribution {}

impl PartialOrd for QueuedContribution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedContribution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Priority queue of contributions, earliest timestamp at the head
#[derive(Debug, Default, Clone)]
pub struct ContributionQueue {
    heap: BinaryHeap<Reverse<QueuedContribution>>,
    next_sequence: u64,
    total_points: i128,
}

impl ContributionQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a contribution
    pub fn push(&mut self, contribution: Contribution) {
        self.total_points += i128::from(contribution.points);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(QueuedContribution {
            sequence,
            contribution,
        }));
    }

    /// Earliest outstanding contribution
    pub fn peek_min(&self) -> Option<&Contribution> {
        self.heap.peek().map(|Reverse(queued)| &queued.contribution)
    }

    /// Remove and return the earliest contribution
    pub fn pop_min(&mut self) -> Option<Contribution> {
        self.pop_min_entry().map(|queued| queued.contribution)
    }

    /// Remove the earliest entry, keeping its sequence so it can be restored
    pub(crate) fn pop_min_entry(&mut self) -> Option<QueuedContribution> {
        let Reverse(queued) = self.heap.pop()?;
        self.total_points -= i128::from(queued.contribution.points);
        Some(queued)
    }

    /// Put back an entry taken by `pop_min_entry`, in its original place
    pub(crate) fn restore(&mut self, queued: QueuedContribution) {
        self.total_points += i128::from(queued.contribution.points);
        self.heap.push(Reverse(queued));
    }

    /// Overwrite the head's remaining points, keeping its place in the order
    ///
    /// Returns the previous value, or `None` when the queue is empty.
    pub fn replace_min_points(&mut self, points: i64) -> Option<i64> {
        let mut head = self.heap.peek_mut()?;
        let previous = head.0.contribution.points;
        head.0.contribution.points = points;
        drop(head);
        self.total_points += i128::from(points) - i128::from(previous);
        Some(previous)
    }

    /// Number of outstanding contributions
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is outstanding
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sum of remaining points across all outstanding contributions
    pub fn total_points(&self) -> i128 {
        self.total_points
    }

    /// Copy of the outstanding contributions in consumption order
    pub fn iter_ordered(&self) -> Vec<Contribution> {
        let mut queued: Vec<_> = self.heap.iter().map(|Reverse(q)| q).collect();
        queued.sort();
        queued.into_iter().map(|q| q.contribution.clone()).collect()
    }
}
