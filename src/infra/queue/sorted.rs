//! Queue kept as a time-sorted list, mirroring a linked message list.
//!
//! Insertion is linear in the queue length; head removal is O(1).

use std::collections::VecDeque;

use crate::core::{WorkItem, WorkQueue};

/// Work queue stored as a sorted `VecDeque`.
#[derive(Debug, Default)]
pub struct SortedQueue {
    items: VecDeque<WorkItem>,
}

impl SortedQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkQueue for SortedQueue {
    fn insert(&mut self, item: WorkItem) {
        // Insert after every item due at or before this one, so equal
        // timestamps stay in insertion order.
        let at = self
            .items
            .partition_point(|queued| queued.scheduled_at_ms <= item.scheduled_at_ms);
        self.items.insert(at, item);
    }

    fn peek_ready(&self, now_ms: u64) -> Option<&WorkItem> {
        self.items.front().filter(|item| item.is_ready(now_ms))
    }

    fn remove_head(&mut self) -> WorkItem {
        match self.items.pop_front() {
            Some(item) => item,
            None => panic!("remove_head called on an empty work queue"),
        }
    }

    fn peek(&self) -> Option<&WorkItem> {
        self.items.front()
    }

    fn snapshot(&self) -> Vec<WorkItem> {
        self.items.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
