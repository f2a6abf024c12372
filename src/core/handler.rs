//! Callback invoked when the loop dispatches an item.

use crate::core::WorkItem;

/// Receives each item as the loop starts processing it.
///
/// Handlers run on the looper's thread of control, inside the tick that
/// dispatched the item, and must not block.
pub trait ItemHandler: Send {
    /// Handle a dispatched item.
    fn handle(&mut self, item: &WorkItem);
}

impl<F> ItemHandler for F
where
    F: FnMut(&WorkItem) + Send,
{
    fn handle(&mut self, item: &WorkItem) {
        self(item);
    }
}
