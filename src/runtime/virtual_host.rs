//! Deterministic host driving a looper on virtual time.
//!
//! Ticks fire at `start + k * poll_interval` while the loop runs, and the
//! completion timer fires `processing_ms` after each dispatch. When both are
//! due at the same instant the completion fires first, so the tick can pick
//! up the next item.

use crate::core::{
    Completion, Looper, SchedulerError, Submission, TickOutcome, WorkItem, WorkQueue,
};
use crate::infra::InMemoryQueue;

/// Something that happened while advancing virtual time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A tick dispatched an item.
    Dispatched {
        /// Tick time.
        at_ms: u64,
        /// Dispatched item.
        item: WorkItem,
    },
    /// The completion timer fired.
    Completed(Completion),
}

/// Single-threaded host owning a looper and a virtual clock.
pub struct VirtualHost<Q = InMemoryQueue> {
    looper: Looper<Q>,
    now_ms: u64,
    next_tick_ms: Option<u64>,
}

impl<Q> VirtualHost<Q>
where
    Q: WorkQueue,
{
    /// Host `looper`, with the clock reading `start_ms`.
    pub fn new(looper: Looper<Q>, start_ms: u64) -> Self {
        Self {
            looper,
            now_ms: start_ms,
            next_tick_ms: None,
        }
    }

    fn poll_interval_ms(&self) -> u64 {
        self.looper.limits().poll_interval_ms.max(1)
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Time of the next scheduled tick, if the loop is ticking.
    #[must_use]
    pub const fn next_tick_ms(&self) -> Option<u64> {
        self.next_tick_ms
    }

    /// The hosted looper.
    #[must_use]
    pub const fn looper(&self) -> &Looper<Q> {
        &self.looper
    }

    /// Mutable access to the hosted looper.
    pub fn looper_mut(&mut self) -> &mut Looper<Q> {
        &mut self.looper
    }

    /// Release the looper.
    pub fn into_looper(self) -> Looper<Q> {
        self.looper
    }

    /// Prepare the looper.
    ///
    /// # Errors
    ///
    /// See [`Looper::prepare`].
    pub fn prepare(&mut self) -> Result<(), SchedulerError> {
        self.looper.prepare(self.now_ms)
    }

    /// Start the looper and schedule the first tick one interval from now.
    ///
    /// # Errors
    ///
    /// See [`Looper::start`].
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        self.looper.start(self.now_ms)?;
        self.next_tick_ms = Some(self.now_ms.saturating_add(self.poll_interval_ms()));
        Ok(())
    }

    /// Stop the looper and cancel future ticks. A pending completion still
    /// fires.
    pub fn stop(&mut self) -> bool {
        let stopped = self.looper.stop(self.now_ms);
        if stopped {
            self.next_tick_ms = None;
        }
        stopped
    }

    /// Submit from the default handler at the current time.
    pub fn submit(&mut self, kind: u32, delay_ms: u64, from_pool: bool) -> WorkItem {
        self.looper.submit(kind, delay_ms, from_pool, self.now_ms)
    }

    /// Post a submission at the current time.
    pub fn post(&mut self, submission: Submission) -> WorkItem {
        self.looper.post(submission, self.now_ms)
    }

    /// Advance by `delta_ms`.
    pub fn advance_by(&mut self, delta_ms: u64) -> Vec<HostEvent> {
        self.advance_to(self.now_ms.saturating_add(delta_ms))
    }

    /// Advance to `target_ms`, firing every timer due on the way in order.
    /// Targets in the past are ignored.
    pub fn advance_to(&mut self, target_ms: u64) -> Vec<HostEvent> {
        let mut events = Vec::new();
        loop {
            let completion_at = self
                .looper
                .in_flight_entry()
                .map(|f| f.completes_at_ms)
                .filter(|&at| at <= target_ms);
            let tick_at = self.next_tick_ms.filter(|&at| at <= target_ms);

            match (completion_at, tick_at) {
                (Some(done), tick) if tick.is_none_or(|t| done <= t) => {
                    self.now_ms = self.now_ms.max(done);
                    if let Some(completion) = self.looper.poll_completion(self.now_ms) {
                        events.push(HostEvent::Completed(completion));
                    }
                }
                (_, Some(tick)) => {
                    self.now_ms = self.now_ms.max(tick);
                    // Ticking ends at the end of representable time.
                    self.next_tick_ms = tick.checked_add(self.poll_interval_ms());
                    if let TickOutcome::Dispatched(item) = self.looper.tick(self.now_ms) {
                        events.push(HostEvent::Dispatched {
                            at_ms: self.now_ms,
                            item,
                        });
                    }
                }
                _ => break,
            }
        }
        self.now_ms = self.now_ms.max(target_ms);
        events
    }
}
