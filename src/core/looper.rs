//! The looper: a single dispatch loop draining a time-ordered work queue.
//!
//! `Looper` is a plain state-and-operations object. It owns the queue, the
//! item pool, the lifecycle state, the in-flight slot, and the trace log, and
//! it never reads a clock or spawns timers itself. Hosts (see
//! [`crate::runtime`]) call [`Looper::tick`] at the poll interval while the
//! loop is running and fire the completion timer through
//! [`Looper::complete`] or [`Looper::poll_completion`].
//!
//! Processing is strictly serial: a tick never dispatches while an item is in
//! flight. Stopping the loop halts dispatch but leaves an already dispatched
//! item to complete normally, including its pool return.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{
    build_trace_event, Checkout, ItemHandler, ItemId, ItemPool, ItemSpec, SchedulerError,
    SchedulerState, Submission, TraceEvent, TraceKind, TraceLog, TraceSink, WorkItem, WorkQueue,
    DEFAULT_TRACE_CAPACITY,
};
use crate::infra::InMemoryQueue;

/// Decides which completed items go back to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecyclePolicy {
    /// Only items that were checked out of the pool are returned.
    #[default]
    PooledOnly,
    /// Every completed item is returned, whatever its provenance.
    Always,
}

impl RecyclePolicy {
    /// Whether `item` goes back to the pool on completion.
    #[must_use]
    pub const fn recycles(self, item: &WorkItem) -> bool {
        item.pooled || matches!(self, Self::Always)
    }
}

/// Fixed timing and sizing of a looper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LooperLimits {
    /// Interval between dispatch ticks, in milliseconds.
    pub poll_interval_ms: u64,
    /// Time an item stays in flight, in milliseconds.
    pub processing_ms: u64,
    /// Maximum free pool slots.
    pub pool_capacity: usize,
    /// Free pool slots at creation.
    pub pool_initial: usize,
    /// Retained trace entries.
    pub trace_capacity: usize,
}

impl Default for LooperLimits {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            processing_ms: 800,
            pool_capacity: 10,
            pool_initial: 5,
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }
}

/// The item currently being processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlight {
    /// The dispatched item.
    pub item: WorkItem,
    /// Dispatch time.
    pub started_at_ms: u64,
    /// Time the completion timer fires.
    pub completes_at_ms: u64,
}

/// What a completion did with its item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The completed item.
    pub item: WorkItem,
    /// Whether the recycle policy offered the item back to the pool. A
    /// return at capacity is absorbed and still counts.
    pub recycled: bool,
    /// Completion time.
    pub at_ms: u64,
}

/// Result of one dispatch tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The loop is not running.
    Idle,
    /// An item is still in flight.
    Busy {
        /// The in-flight item.
        item_id: ItemId,
    },
    /// Nothing is queued.
    Empty,
    /// The head item is not due yet.
    Waiting {
        /// Scheduled time of the head item.
        next_at_ms: u64,
    },
    /// The head item was dequeued and is now in flight.
    Dispatched(WorkItem),
}

/// Single-consumer dispatch loop over a time-ordered work queue.
pub struct Looper<Q = InMemoryQueue> {
    session_id: Uuid,
    thread_name: String,
    limits: LooperLimits,
    state: SchedulerState,
    queue: Q,
    pool: ItemPool,
    in_flight: Option<InFlight>,
    recycle: RecyclePolicy,
    trace: TraceLog,
    mirror: Option<Box<dyn TraceSink>>,
    handler: Option<Box<dyn ItemHandler>>,
}

impl Looper<InMemoryQueue> {
    /// Looper with default limits over an in-memory queue.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LooperLimits::default(), InMemoryQueue::new())
    }
}

impl<Q> Looper<Q>
where
    Q: WorkQueue,
{
    /// Create a new looper from limits and a queue backend.
    pub fn new(limits: LooperLimits, queue: Q) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            thread_name: "main".into(),
            pool: ItemPool::new(limits.pool_capacity, limits.pool_initial),
            trace: TraceLog::new(limits.trace_capacity),
            limits,
            state: SchedulerState::Uninitialized,
            queue,
            in_flight: None,
            recycle: RecyclePolicy::default(),
            mirror: None,
            handler: None,
        }
    }

    /// Attach a sink that receives a copy of every trace event.
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.mirror = Some(sink);
        self
    }

    /// Attach the callback invoked for every dispatched item.
    #[must_use]
    pub fn with_handler(self, handler: impl ItemHandler + 'static) -> Self {
        self.with_boxed_handler(Box::new(handler))
    }

    /// Attach an already boxed dispatch callback.
    #[must_use]
    pub fn with_boxed_handler(mut self, handler: Box<dyn ItemHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Name the thread this looper belongs to (informational).
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the initial recycle policy.
    #[must_use]
    pub fn with_recycle_policy(mut self, policy: RecyclePolicy) -> Self {
        self.recycle = policy;
        self
    }

    /// Change the recycle policy. Applies to completions from now on,
    /// including the item currently in flight.
    pub fn set_recycle_policy(&mut self, policy: RecyclePolicy) {
        if self.recycle != policy {
            debug!(?policy, "recycle policy changed");
        }
        self.recycle = policy;
    }

    /// Current recycle policy.
    #[must_use]
    pub const fn recycle_policy(&self) -> RecyclePolicy {
        self.recycle
    }

    /// Session identifier, fixed for the looper's lifetime.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Informational thread name.
    #[must_use]
    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Timing and sizing in effect.
    #[must_use]
    pub const fn limits(&self) -> &LooperLimits {
        &self.limits
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Free pool slots.
    #[must_use]
    pub const fn pool_available(&self) -> usize {
        self.pool.available()
    }

    /// Pool capacity.
    #[must_use]
    pub const fn pool_capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// The item being processed, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<&WorkItem> {
        self.in_flight.as_ref().map(|f| &f.item)
    }

    /// Full in-flight record, including timer deadlines.
    #[must_use]
    pub const fn in_flight_entry(&self) -> Option<&InFlight> {
        self.in_flight.as_ref()
    }

    /// Pending items in dequeue order.
    #[must_use]
    pub fn queue_snapshot(&self) -> Vec<WorkItem> {
        self.queue.snapshot()
    }

    /// Number of pending items.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Rendered trace entries, newest first.
    #[must_use]
    pub fn trace_snapshot(&self) -> Vec<String> {
        self.trace.lines()
    }

    /// Typed trace entries, newest first.
    #[must_use]
    pub fn trace_events(&self) -> Vec<TraceEvent> {
        self.trace.events()
    }

    /// Move from `Uninitialized` to `Prepared`.
    ///
    /// # Errors
    ///
    /// `AlreadyPrepared` if called a second time; the state is unchanged.
    pub fn prepare(&mut self, now_ms: u64) -> Result<(), SchedulerError> {
        match self.state.on_prepare() {
            Ok(next) => {
                self.state = next;
                info!(session = %self.session_id, thread = %self.thread_name, "looper prepared");
                let message = format!("prepare() on thread {}", self.thread_name);
                self.record(now_ms, TraceKind::Prepared, None, message);
                Ok(())
            }
            Err(err) => {
                warn!(state = %self.state, "prepare rejected: {err}");
                self.record(now_ms, TraceKind::Rejected, None, format!("prepare() rejected: {err}"));
                Err(err)
            }
        }
    }

    /// Start the loop from `Prepared` or `Stopped`.
    ///
    /// # Errors
    ///
    /// `NotPrepared` before `prepare()`, `AlreadyRunning` while running. The
    /// state is unchanged in both cases.
    pub fn start(&mut self, now_ms: u64) -> Result<(), SchedulerError> {
        match self.state.on_start() {
            Ok(next) => {
                let resumed = self.state == SchedulerState::Stopped;
                self.state = next;
                info!(session = %self.session_id, resumed, "looper started");
                let message = if resumed {
                    "loop() resumed, waiting for work"
                } else {
                    "loop() started, waiting for work"
                };
                self.record(now_ms, TraceKind::Started, None, message);
                Ok(())
            }
            Err(err) => {
                warn!(state = %self.state, "start rejected: {err}");
                self.record(now_ms, TraceKind::Rejected, None, format!("loop() rejected: {err}"));
                Err(err)
            }
        }
    }

    /// Stop the loop. Returns `false` (and changes nothing) unless running.
    ///
    /// An item already in flight is not affected.
    pub fn stop(&mut self, now_ms: u64) -> bool {
        if let Some(next) = self.state.on_stop() {
            self.state = next;
            info!(session = %self.session_id, in_flight = self.in_flight.is_some(), "looper stopped");
            self.record(now_ms, TraceKind::Stopped, None, "quit() stopped the loop");
            true
        } else {
            debug!(state = %self.state, "stop ignored");
            let message = format!("quit() ignored, looper is {}", self.state);
            self.record(now_ms, TraceKind::Ignored, None, message);
            false
        }
    }

    /// Submit work from the default handler.
    pub fn submit(&mut self, kind: u32, delay_ms: u64, from_pool: bool, now_ms: u64) -> WorkItem {
        let mut submission = Submission::new(kind).delayed(delay_ms);
        submission.from_pool = from_pool;
        self.post(submission, now_ms)
    }

    /// Allocate or obtain an item for `submission` and queue it.
    ///
    /// Never fails: submitting before `prepare()` is traced as a warning, and
    /// an empty pool falls back to a fresh allocation.
    pub fn post(&mut self, submission: Submission, now_ms: u64) -> WorkItem {
        let Submission {
            kind,
            delay_ms,
            from_pool,
            origin,
        } = submission;

        if !self.state.is_prepared() {
            warn!(%origin, "submission before prepare");
            let message = format!("{origin}: looper not ready, sending anyway");
            self.record(now_ms, TraceKind::NotReady, None, message);
        }

        let spec = ItemSpec {
            kind,
            scheduled_at_ms: now_ms.saturating_add(delay_ms),
            origin,
        };

        let item = if from_pool {
            match self.pool.checkout(spec) {
                Checkout::Recycled(item) => {
                    let message = format!("obtain() reused a pooled item ({} left)", self.pool.available());
                    self.record(now_ms, TraceKind::Obtained, Some(item.id), message);
                    item
                }
                Checkout::Exhausted(item) => {
                    warn!(item_id = item.id, "pool empty, allocating fresh item");
                    self.record(
                        now_ms,
                        TraceKind::PoolEmpty,
                        Some(item.id),
                        "pool empty, created a new item anyway",
                    );
                    item
                }
            }
        } else {
            let item = self.pool.allocate_fresh(spec);
            self.record(now_ms, TraceKind::Allocated, Some(item.id), "new item allocated");
            item
        };

        self.queue.insert(item.clone());
        debug!(
            item_id = item.id,
            kind = item.kind,
            scheduled_at_ms = item.scheduled_at_ms,
            depth = self.queue.len(),
            "item enqueued"
        );
        let message = if delay_ms > 0 {
            format!("sendMessageDelayed(what={kind}, delay={delay_ms}ms)")
        } else {
            format!("sendMessage(what={kind})")
        };
        self.record(now_ms, TraceKind::Enqueued, Some(item.id), message);
        item
    }

    /// Run one dispatch tick at `now_ms`.
    ///
    /// Dispatches the head item if the loop is running, nothing is in flight,
    /// and the head is due. Otherwise leaves everything untouched.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Idle;
        }
        if let Some(current) = &self.in_flight {
            return TickOutcome::Busy {
                item_id: current.item.id,
            };
        }
        let Some(next_at_ms) = self.queue.peek().map(|item| item.scheduled_at_ms) else {
            return TickOutcome::Empty;
        };
        if self.queue.peek_ready(now_ms).is_none() {
            return TickOutcome::Waiting { next_at_ms };
        }

        let item = self.queue.remove_head();
        if let Some(handler) = self.handler.as_mut() {
            handler.handle(&item);
        }
        let completes_at_ms = now_ms.saturating_add(self.limits.processing_ms);
        debug!(item_id = item.id, kind = item.kind, completes_at_ms, "item dispatched");
        let message = format!("dispatchMessage(what={}) from {}", item.kind, item.origin);
        self.record(now_ms, TraceKind::Dispatched, Some(item.id), message);
        self.in_flight = Some(InFlight {
            item: item.clone(),
            started_at_ms: now_ms,
            completes_at_ms,
        });
        TickOutcome::Dispatched(item)
    }

    /// Fire the completion timer for `item_id`.
    ///
    /// Returns `None` if that item is not in flight (a stale timer). Works in
    /// every state: stopping the loop does not cancel a pending completion.
    pub fn complete(&mut self, item_id: ItemId, now_ms: u64) -> Option<Completion> {
        if self.in_flight.as_ref().map(|f| f.item.id) != Some(item_id) {
            debug!(item_id, "stale completion ignored");
            return None;
        }
        self.finish(now_ms)
    }

    /// Complete the in-flight item if its timer has expired by `now_ms`.
    pub fn poll_completion(&mut self, now_ms: u64) -> Option<Completion> {
        let due = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.completes_at_ms <= now_ms);
        if due {
            self.finish(now_ms)
        } else {
            None
        }
    }

    fn finish(&mut self, now_ms: u64) -> Option<Completion> {
        let InFlight { item, .. } = self.in_flight.take()?;
        let recycled = self.recycle.recycles(&item);
        if recycled {
            let accepted = self.pool.return_item();
            debug!(item_id = item.id, accepted, available = self.pool.available(), "item recycled");
            let message = if accepted {
                format!("item what={} recycled back to pool ({} available)", item.kind, self.pool.available())
            } else {
                format!("item what={} recycled, pool already full ({} available)", item.kind, self.pool.available())
            };
            self.record(now_ms, TraceKind::Recycled, Some(item.id), message);
        } else {
            debug!(item_id = item.id, "item completed");
            let message = format!("item what={} processed", item.kind);
            self.record(now_ms, TraceKind::Completed, Some(item.id), message);
        }
        Some(Completion {
            item,
            recycled,
            at_ms: now_ms,
        })
    }

    fn record(&mut self, now_ms: u64, kind: TraceKind, item_id: Option<ItemId>, message: impl Into<String>) {
        let event = build_trace_event(now_ms, kind, item_id, message);
        if let Some(mirror) = self.mirror.as_mut() {
            mirror.record(event.clone());
        }
        self.trace.record(event);
    }
}
