//! Core engine: lifecycle, work items, pool, queue abstraction, trace log.

pub mod error;
pub mod handler;
pub mod item;
pub mod looper;
pub mod pool;
pub mod queue;
pub mod state;
pub mod trace;

pub use error::{AppResult, SchedulerError};
pub use handler::ItemHandler;
pub use item::{ItemId, ItemSpec, Submission, WorkItem, DEFAULT_ORIGIN};
pub use looper::{Completion, InFlight, Looper, LooperLimits, RecyclePolicy, TickOutcome};
pub use pool::{Checkout, ItemPool};
pub use queue::WorkQueue;
pub use state::SchedulerState;
pub use trace::{
    build_trace_event, TraceEvent, TraceKind, TraceLog, TraceSink, DEFAULT_TRACE_CAPACITY,
};
