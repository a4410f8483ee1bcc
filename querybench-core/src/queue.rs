//! Wait-Free Task Queue
//!
//! An immutable array of [`WorkGroup`]s plus one shared cursor. Each claim is a
//! single `fetch_add` on the cursor: the caller gets a unique index and owns the
//! group at that index outright. No locks, no per-claim allocation, and a claim
//! completes in a bounded number of steps however many workers contend.

use crate::query::WorkGroup;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Pre-populated queue of host groups, consumed one group at a time by [`claim`](TaskQueue::claim)
#[derive(Debug)]
pub struct TaskQueue {
    groups: Box<[WorkGroup]>,
    cursor: AtomicUsize,
    query_count: usize,
}

impl TaskQueue {
    /// Build a queue that takes ownership of `groups`.
    ///
    /// Groups are handed out in the order given.
    pub fn new(groups: Vec<WorkGroup>) -> Self {
        let query_count = groups.iter().map(WorkGroup::len).sum();
        Self {
            groups: groups.into_boxed_slice(),
            cursor: AtomicUsize::new(0),
            query_count,
        }
    }

    /// Claim the next unclaimed group, or `None` once every group is taken.
    ///
    /// Safe to call from any number of threads; each group is returned to
    /// exactly one caller.
    pub fn claim(&self) -> Option<&WorkGroup> {
        // The slice is never mutated after construction, so the index alone
        // decides ownership and no ordering beyond atomicity is needed.
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.groups.get(index)
    }

    /// Total number of groups, claimed or not
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the queue was built with no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of queries across all groups
    pub fn query_count(&self) -> usize {
        self.query_count
    }

    /// All groups in claim order
    pub fn groups(&self) -> &[WorkGroup] {
        &self.groups
    }
}
