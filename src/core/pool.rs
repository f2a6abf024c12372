//! Bounded reuse pool for work items.
//!
//! The pool only counts free slots; items themselves are built on checkout.
//! A checkout against an empty pool falls back to a fresh allocation instead
//! of failing, and returns beyond capacity are absorbed.

use crate::core::{ItemSpec, WorkItem};

/// Result of a pool checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    /// A slot was taken from the pool; the item is flagged `pooled`.
    Recycled(WorkItem),
    /// The pool was empty; the item was freshly allocated instead.
    Exhausted(WorkItem),
}

impl Checkout {
    /// Whether the pool was empty at checkout time.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    /// Borrow the item regardless of provenance.
    #[must_use]
    pub const fn item(&self) -> &WorkItem {
        match self {
            Self::Recycled(item) | Self::Exhausted(item) => item,
        }
    }

    /// Take the item regardless of provenance.
    #[must_use]
    pub fn into_item(self) -> WorkItem {
        match self {
            Self::Recycled(item) | Self::Exhausted(item) => item,
        }
    }
}

/// Counter of free item slots, bounded to `[0, capacity]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPool {
    capacity: usize,
    available: usize,
}

impl ItemPool {
    /// Create a pool with `available` free slots, clamped to `capacity`.
    #[must_use]
    pub fn new(capacity: usize, available: usize) -> Self {
        Self {
            capacity,
            available: available.min(capacity),
        }
    }

    /// Maximum number of free slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of free slots.
    #[must_use]
    pub const fn available(&self) -> usize {
        self.available
    }

    /// Build a new item without touching the pool.
    #[must_use]
    pub fn allocate_fresh(&self, spec: ItemSpec) -> WorkItem {
        spec.into_item(false)
    }

    /// Take a slot if one is free, otherwise fall back to a fresh allocation.
    pub fn checkout(&mut self, spec: ItemSpec) -> Checkout {
        if self.available == 0 {
            return Checkout::Exhausted(self.allocate_fresh(spec));
        }
        self.available -= 1;
        Checkout::Recycled(spec.into_item(true))
    }

    /// Give a slot back. Returns `false` when the pool was already full and
    /// the return was absorbed.
    pub fn return_item(&mut self) -> bool {
        if self.available >= self.capacity {
            return false;
        }
        self.available += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_ORIGIN;

    fn spec(kind: u32) -> ItemSpec {
        ItemSpec {
            kind,
            scheduled_at_ms: 0,
            origin: DEFAULT_ORIGIN.into(),
        }
    }

    #[test]
    fn checkout_drains_then_falls_back() {
        let mut pool = ItemPool::new(10, 2);

        let first = pool.checkout(spec(1));
        assert!(!first.is_exhausted());
        assert!(first.item().pooled);
        assert_eq!(pool.available(), 1);

        let _ = pool.checkout(spec(2));
        assert_eq!(pool.available(), 0);

        let fallback = pool.checkout(spec(3));
        assert!(fallback.is_exhausted());
        assert!(!fallback.into_item().pooled);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn fresh_allocation_leaves_count_alone() {
        let pool = ItemPool::new(10, 5);
        let item = pool.allocate_fresh(spec(4));
        assert!(!item.pooled);
        assert_eq!(pool.available(), 5);
    }

    #[test]
    fn returns_saturate_at_capacity() {
        let mut pool = ItemPool::new(3, 2);
        assert!(pool.return_item());
        assert!(!pool.return_item());
        assert!(!pool.return_item());
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn initial_count_clamped_to_capacity() {
        let pool = ItemPool::new(4, 9);
        assert_eq!(pool.available(), 4);
        assert_eq!(pool.capacity(), 4);
    }
}
