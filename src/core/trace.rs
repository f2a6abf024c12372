//! Trace log of looper operations.
//!
//! The log is observational only: nothing in the engine reads it back.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::ItemId;

/// Default number of retained trace entries.
pub const DEFAULT_TRACE_CAPACITY: usize = 50;

/// Category of a trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// `prepare()` succeeded.
    Prepared,
    /// `start()` succeeded.
    Started,
    /// `stop()` moved the loop out of `Running`.
    Stopped,
    /// A transition was rejected.
    Rejected,
    /// A no-op transition request was ignored.
    Ignored,
    /// Submission accepted while the looper was not prepared.
    NotReady,
    /// Item freshly allocated.
    Allocated,
    /// Item checked out of the pool.
    Obtained,
    /// Pool checkout fell back to a fresh allocation.
    PoolEmpty,
    /// Item inserted into the queue.
    Enqueued,
    /// Item dequeued and handed to the handler.
    Dispatched,
    /// In-flight item completed and discarded.
    Completed,
    /// In-flight item completed and returned to the pool.
    Recycled,
}

impl TraceKind {
    /// Short tag used when rendering entries.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Prepared => "prepare",
            Self::Started => "loop",
            Self::Stopped => "quit",
            Self::Rejected => "reject",
            Self::Ignored => "noop",
            Self::NotReady => "warn",
            Self::Allocated => "new",
            Self::Obtained => "obtain",
            Self::PoolEmpty => "pool-empty",
            Self::Enqueued => "enqueue",
            Self::Dispatched => "dispatch",
            Self::Completed => "done",
            Self::Recycled => "recycle",
        }
    }
}

/// A single trace entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Time of the operation in milliseconds.
    pub at_ms: u64,
    /// Category.
    pub kind: TraceKind,
    /// Item the entry refers to, if any.
    pub item_id: Option<ItemId>,
    /// Human-readable description.
    pub message: String,
}

impl TraceEvent {
    /// Render as a single log line.
    #[must_use]
    pub fn render(&self) -> String {
        format!("[{}ms] {}: {}", self.at_ms, self.kind.tag(), self.message)
    }
}

/// Helper to build a trace event.
pub fn build_trace_event(
    at_ms: u64,
    kind: TraceKind,
    item_id: Option<ItemId>,
    message: impl Into<String>,
) -> TraceEvent {
    TraceEvent {
        at_ms,
        kind,
        item_id,
        message: message.into(),
    }
}

/// Trace sink abstraction.
pub trait TraceSink: Send {
    /// Record a trace event.
    fn record(&mut self, event: TraceEvent);
}

/// Bounded, newest-first trace buffer.
#[derive(Debug, Clone)]
pub struct TraceLog {
    events: VecDeque<TraceEvent>,
    max_events: usize,
}

impl TraceLog {
    /// Create a log keeping at most `max_events` entries.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Stored events, newest first.
    #[must_use]
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.iter().cloned().collect()
    }

    /// Rendered entries, newest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(TraceEvent::render).collect()
    }

    /// Most recent event.
    #[must_use]
    pub fn latest(&self) -> Option<&TraceEvent> {
        self.events.front()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for TraceLog {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_CAPACITY)
    }
}

impl TraceSink for TraceLog {
    fn record(&mut self, event: TraceEvent) {
        self.events.push_front(event);
        self.events.truncate(self.max_events);
    }
}
