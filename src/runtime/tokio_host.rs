//! Tokio host: the looper behind a mutex, ticked by a spawned interval task.
//!
//! Every engine operation (submission, tick, completion, transition, trace
//! append) runs inside one `parking_lot::Mutex` critical section, so the
//! serial-processing guarantee holds on a multi-threaded runtime. The ticker
//! only lives while the loop runs; each dispatched item gets a one-shot
//! completion task that fires even if the loop is stopped meanwhile.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{LooperSnapshot, Spawn, TokioSpawner};
use crate::core::{
    ItemId, Looper, RecyclePolicy, SchedulerError, SchedulerState, Submission, TickOutcome,
    WorkItem, WorkQueue,
};
use crate::infra::InMemoryQueue;
use crate::util::Clock;

/// Clock reading milliseconds since creation on tokio's (pausable) timer.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    /// Clock reading zero now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Looper hosted on a tokio runtime.
pub struct TokioHost<Q = InMemoryQueue, S = TokioSpawner> {
    looper: Arc<Mutex<Looper<Q>>>,
    clock: Arc<dyn Clock>,
    spawner: S,
    generation: Arc<AtomicU64>,
}

impl<Q, S> TokioHost<Q, S>
where
    Q: WorkQueue + 'static,
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Host `looper`, timing it with a fresh [`TokioClock`].
    pub fn new(looper: Looper<Q>, spawner: S) -> Self {
        Self::with_clock(looper, spawner, Arc::new(TokioClock::new()))
    }

    /// Host `looper` with a custom clock.
    pub fn with_clock(looper: Looper<Q>, spawner: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            looper: Arc::new(Mutex::new(looper)),
            clock,
            spawner,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Read the looper inside its critical section. Mutation goes through
    /// the host so every dispatch gets its completion timer.
    pub fn with_looper<R>(&self, f: impl FnOnce(&Looper<Q>) -> R) -> R {
        let looper = self.looper.lock();
        f(&looper)
    }

    /// Current clock reading.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Prepare the looper.
    ///
    /// # Errors
    ///
    /// See [`Looper::prepare`].
    pub fn prepare(&self) -> Result<(), SchedulerError> {
        let now = self.clock.now_ms();
        self.looper.lock().prepare(now)
    }

    /// Start the looper and spawn its ticker.
    ///
    /// # Errors
    ///
    /// See [`Looper::start`]; no ticker is spawned on error.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let now = self.clock.now_ms();
        let limits = {
            let mut looper = self.looper.lock();
            looper.start(now)?;
            looper.limits().clone()
        };
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, poll_interval_ms = limits.poll_interval_ms, "spawning looper ticker");
        self.spawn_ticker(generation, limits.poll_interval_ms, limits.processing_ms);
        Ok(())
    }

    /// Stop the looper. The ticker retires on its next wake-up; a pending
    /// completion still fires.
    pub fn stop(&self) -> bool {
        let now = self.clock.now_ms();
        let stopped = self.looper.lock().stop(now);
        if stopped {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        stopped
    }

    /// Submit from the default handler.
    pub fn submit(&self, kind: u32, delay_ms: u64, from_pool: bool) -> WorkItem {
        let now = self.clock.now_ms();
        self.looper.lock().submit(kind, delay_ms, from_pool, now)
    }

    /// Post a submission.
    pub fn post(&self, submission: Submission) -> WorkItem {
        let now = self.clock.now_ms();
        self.looper.lock().post(submission, now)
    }

    /// A named handler posting to this looper.
    pub fn handler(&self, name: impl Into<String>) -> Handler<Q> {
        Handler {
            name: name.into(),
            looper: Arc::clone(&self.looper),
            clock: Arc::clone(&self.clock),
        }
    }

    /// Change the recycle policy.
    pub fn set_recycle_policy(&self, policy: RecyclePolicy) {
        self.looper.lock().set_recycle_policy(policy);
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.looper.lock().state()
    }

    /// The item being processed, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<WorkItem> {
        self.looper.lock().in_flight().cloned()
    }

    /// Free pool slots.
    #[must_use]
    pub fn pool_available(&self) -> usize {
        self.looper.lock().pool_available()
    }

    /// Pending items in dequeue order.
    #[must_use]
    pub fn queue_snapshot(&self) -> Vec<WorkItem> {
        self.looper.lock().queue_snapshot()
    }

    /// Rendered trace entries, newest first.
    #[must_use]
    pub fn trace_snapshot(&self) -> Vec<String> {
        self.looper.lock().trace_snapshot()
    }

    /// Full snapshot.
    #[must_use]
    pub fn snapshot(&self) -> LooperSnapshot {
        let looper = self.looper.lock();
        LooperSnapshot::capture(&*looper)
    }

    fn spawn_ticker(&self, generation: u64, poll_interval_ms: u64, processing_ms: u64) {
        let looper = Arc::clone(&self.looper);
        let clock = Arc::clone(&self.clock);
        let current = Arc::clone(&self.generation);
        let spawner = self.spawner.clone();

        self.spawner.spawn(async move {
            let period = Duration::from_millis(poll_interval_ms.max(1));
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if current.load(Ordering::Acquire) != generation {
                    break;
                }
                let outcome = {
                    let mut guard = looper.lock();
                    if !guard.state().is_running() {
                        break;
                    }
                    guard.tick(clock.now_ms())
                };
                if let TickOutcome::Dispatched(item) = outcome {
                    spawn_completion(
                        &spawner,
                        Arc::clone(&looper),
                        Arc::clone(&clock),
                        item.id,
                        processing_ms,
                    );
                }
            }
            debug!(generation, "looper ticker retired");
        });
    }
}

impl<Q, S: Clone> Clone for TokioHost<Q, S> {
    fn clone(&self) -> Self {
        Self {
            looper: Arc::clone(&self.looper),
            clock: Arc::clone(&self.clock),
            spawner: self.spawner.clone(),
            generation: Arc::clone(&self.generation),
        }
    }
}

fn spawn_completion<Q, S>(
    spawner: &S,
    looper: Arc<Mutex<Looper<Q>>>,
    clock: Arc<dyn Clock>,
    item_id: ItemId,
    processing_ms: u64,
) where
    Q: WorkQueue + 'static,
    S: Spawn,
{
    spawner.spawn(async move {
        tokio::time::sleep(Duration::from_millis(processing_ms)).await;
        let now = clock.now_ms();
        let completion = looper.lock().complete(item_id, now);
        if let Some(done) = completion {
            debug!(item_id, recycled = done.recycled, "completion timer fired");
        }
    });
}

/// A named producer bound to one hosted looper.
pub struct Handler<Q = InMemoryQueue> {
    name: String,
    looper: Arc<Mutex<Looper<Q>>>,
    clock: Arc<dyn Clock>,
}

impl<Q> Clone for Handler<Q> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            looper: Arc::clone(&self.looper),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<Q> Handler<Q>
where
    Q: WorkQueue,
{
    /// Handler name, recorded as each item's origin.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue freshly allocated work for immediate dispatch.
    pub fn send(&self, kind: u32) -> WorkItem {
        self.post(Submission::new(kind))
    }

    /// Queue freshly allocated work `delay_ms` from now.
    pub fn send_delayed(&self, kind: u32, delay_ms: u64) -> WorkItem {
        self.post(Submission::new(kind).delayed(delay_ms))
    }

    /// Obtain an item from the pool and queue it for immediate dispatch.
    pub fn obtain_and_send(&self, kind: u32) -> WorkItem {
        self.post(Submission::new(kind).obtained())
    }

    /// Post `submission` under this handler's name.
    pub fn post(&self, submission: Submission) -> WorkItem {
        let now = self.clock.now_ms();
        self.looper
            .lock()
            .post(submission.from_handler(self.name.clone()), now)
    }
}
