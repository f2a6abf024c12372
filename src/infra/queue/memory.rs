//! In-memory queue ordered by scheduled time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::{WorkItem, WorkQueue};

/// Wrapper to make `WorkItem` orderable by scheduled time (earliest first) and
/// FIFO within the same time.
#[derive(Debug)]
struct TimedItem {
    seq: u64,
    item: WorkItem,
}

impl TimedItem {
    const fn key(&self) -> (u64, u64) {
        (self.item.scheduled_at_ms, self.seq)
    }
}

impl PartialEq for TimedItem {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TimedItem {}

impl PartialOrd for TimedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for max-heap: smallest (time, seq) pops first.
        other.key().cmp(&self.key())
    }
}

/// In-memory queue storing work items in a binary heap.
/// This provides O(log n) insertion and O(log n) head removal.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    next_seq: u64,
    items: BinaryHeap<TimedItem>,
}

impl InMemoryQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue with room for `capacity` items.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            items: BinaryHeap::with_capacity(capacity),
        }
    }
}

impl WorkQueue for InMemoryQueue {
    fn insert(&mut self, item: WorkItem) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push(TimedItem { seq, item });
    }

    fn peek_ready(&self, now_ms: u64) -> Option<&WorkItem> {
        self.peek().filter(|item| item.is_ready(now_ms))
    }

    fn remove_head(&mut self) -> WorkItem {
        match self.items.pop() {
            Some(timed) => timed.item,
            None => panic!("remove_head called on an empty work queue"),
        }
    }

    fn peek(&self) -> Option<&WorkItem> {
        self.items.peek().map(|timed| &timed.item)
    }

    fn snapshot(&self) -> Vec<WorkItem> {
        let mut ordered: Vec<&TimedItem> = self.items.iter().collect();
        // `TimedItem` orders in reverse, so sort descending to get dequeue order.
        ordered.sort_by(|a, b| b.cmp(a));
        ordered.into_iter().map(|timed| timed.item.clone()).collect()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
