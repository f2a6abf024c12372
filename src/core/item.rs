//! Work items and their identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-unique work item identifier.
pub type ItemId = u64;

/// Origin recorded when the caller does not name a handler.
pub const DEFAULT_ORIGIN: &str = "Handler";

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(0);

/// Allocate the next item id. Ids are never reused within a process.
pub(crate) fn next_item_id() -> ItemId {
    NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed)
}

/// One unit of scheduled work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Process-unique sequence number.
    pub id: ItemId,
    /// Opaque payload discriminator.
    pub kind: u32,
    /// Absolute time (ms) at which the item becomes eligible for dispatch.
    pub scheduled_at_ms: u64,
    /// Name of the submitting handler.
    pub origin: String,
    /// Set when the item was checked out of the reuse pool.
    pub pooled: bool,
}

impl WorkItem {
    /// Whether the item may be dispatched at `now_ms`.
    #[must_use]
    pub const fn is_ready(&self, now_ms: u64) -> bool {
        self.scheduled_at_ms <= now_ms
    }
}

/// Caller-supplied fields of a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    /// Payload discriminator.
    pub kind: u32,
    /// Absolute dispatch time in milliseconds.
    pub scheduled_at_ms: u64,
    /// Submitting handler name.
    pub origin: String,
}

impl ItemSpec {
    pub(crate) fn into_item(self, pooled: bool) -> WorkItem {
        WorkItem {
            id: next_item_id(),
            kind: self.kind,
            scheduled_at_ms: self.scheduled_at_ms,
            origin: self.origin,
            pooled,
        }
    }
}

/// A submission request as handed to [`crate::core::Looper::post`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Payload discriminator.
    pub kind: u32,
    /// Delay from submission time, in milliseconds.
    pub delay_ms: u64,
    /// Ask for a pooled item instead of a fresh allocation.
    pub from_pool: bool,
    /// Submitting handler name.
    pub origin: String,
}

impl Submission {
    /// Immediate, freshly allocated submission from the default handler.
    #[must_use]
    pub fn new(kind: u32) -> Self {
        Self {
            kind,
            delay_ms: 0,
            from_pool: false,
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }

    /// Delay dispatch by `delay_ms`.
    #[must_use]
    pub fn delayed(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Obtain the item from the reuse pool.
    #[must_use]
    pub fn obtained(mut self) -> Self {
        self.from_pool = true;
        self
    }

    /// Record `origin` as the submitting handler.
    #[must_use]
    pub fn from_handler(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}
