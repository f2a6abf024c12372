//! Time-ordered work queue abstraction.

use crate::core::WorkItem;

/// Abstraction for work queue backends.
///
/// Items leave the queue in `(scheduled_at_ms, insertion order)` order. The
/// queue is a time axis, not a priority structure.
pub trait WorkQueue: Send {
    /// Insert an item, keeping the time order. Items with equal
    /// `scheduled_at_ms` keep their insertion order.
    fn insert(&mut self, item: WorkItem);

    /// The head item, if and only if it is due at `now_ms`.
    fn peek_ready(&self, now_ms: u64) -> Option<&WorkItem>;

    /// Remove and return the head item.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Callers check with
    /// [`WorkQueue::peek_ready`] first.
    fn remove_head(&mut self) -> WorkItem;

    /// The head item regardless of readiness.
    fn peek(&self) -> Option<&WorkItem>;

    /// Pending items in dequeue order.
    fn snapshot(&self) -> Vec<WorkItem>;

    /// Current depth.
    fn len(&self) -> usize;

    /// Whether no items are pending.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
