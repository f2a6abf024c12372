//! API-facing snapshot models for presentation layers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{InFlight, Looper, RecyclePolicy, SchedulerState, WorkItem, WorkQueue};

/// Pool counters for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Free slots.
    pub available: usize,
    /// Maximum free slots.
    pub capacity: usize,
}

/// Read-only view of a looper at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LooperSnapshot {
    /// Session identifier.
    pub session_id: Uuid,
    /// Informational thread name.
    pub thread_name: String,
    /// Lifecycle state.
    pub state: SchedulerState,
    /// Pending items in dequeue order.
    pub queue: Vec<WorkItem>,
    /// Pool counters.
    pub pool: PoolSnapshot,
    /// Item being processed, with its timer deadlines.
    pub in_flight: Option<InFlight>,
    /// Active recycle policy.
    pub recycle: RecyclePolicy,
    /// Rendered trace entries, newest first.
    pub trace: Vec<String>,
}

impl LooperSnapshot {
    /// Capture `looper`.
    pub fn capture<Q: WorkQueue>(looper: &Looper<Q>) -> Self {
        Self {
            session_id: looper.session_id(),
            thread_name: looper.thread_name().to_string(),
            state: looper.state(),
            queue: looper.queue_snapshot(),
            pool: PoolSnapshot {
                available: looper.pool_available(),
                capacity: looper.pool_capacity(),
            },
            in_flight: looper.in_flight_entry().cloned(),
            recycle: looper.recycle_policy(),
            trace: looper.trace_snapshot(),
        }
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<Q: WorkQueue> From<&Looper<Q>> for LooperSnapshot {
    fn from(looper: &Looper<Q>) -> Self {
        Self::capture(looper)
    }
}
