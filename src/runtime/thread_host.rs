//! Owning-thread host.
//!
//! The looper lives on one dedicated OS thread. Callers talk to it over a
//! command channel; ticks and the completion timer are channels too, so the
//! owner thread multiplexes everything with a single `select!` and never
//! needs a lock.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{after, bounded, never, select, tick, unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use super::LooperSnapshot;
use crate::core::{
    ItemId, Looper, RecyclePolicy, SchedulerError, Submission, TickOutcome, WorkItem, WorkQueue,
};
use crate::infra::InMemoryQueue;
use crate::util::Clock;

enum Command {
    Prepare(Sender<Result<(), SchedulerError>>),
    Start(Sender<Result<(), SchedulerError>>),
    Stop(Sender<bool>),
    Post(Submission, Sender<WorkItem>),
    SetRecycle(RecyclePolicy),
    Snapshot(Sender<LooperSnapshot>),
    Shutdown,
}

enum Wakeup {
    Command(Option<Command>),
    Tick,
    Completion,
}

/// Handle to a looper running on its own thread.
pub struct ThreadHost<Q = InMemoryQueue> {
    commands: Sender<Command>,
    owner: Option<JoinHandle<Looper<Q>>>,
}

impl<Q> ThreadHost<Q>
where
    Q: WorkQueue + 'static,
{
    /// Move `looper` onto a new owner thread.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Spawn` if the thread cannot be created.
    pub fn spawn(looper: Looper<Q>, clock: Arc<dyn Clock>) -> Result<Self, SchedulerError> {
        let (commands, inbox) = unbounded();
        let name = format!("looper-{}", looper.thread_name());
        let owner = thread::Builder::new()
            .name(name)
            .spawn(move || run_owner(looper, &inbox, clock.as_ref()))
            .map_err(|e| SchedulerError::Spawn(e.to_string()))?;
        Ok(Self {
            commands,
            owner: Some(owner),
        })
    }

    fn request<T>(&self, make: impl FnOnce(Sender<T>) -> Command) -> Result<T, SchedulerError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.commands
            .send(make(reply_tx))
            .map_err(|_| SchedulerError::Disconnected)?;
        reply_rx.recv().map_err(|_| SchedulerError::Disconnected)
    }

    /// Prepare the looper.
    ///
    /// # Errors
    ///
    /// See [`Looper::prepare`]; `Disconnected` if the owner is gone.
    pub fn prepare(&self) -> Result<(), SchedulerError> {
        self.request(Command::Prepare)?
    }

    /// Start the looper; the owner begins ticking.
    ///
    /// # Errors
    ///
    /// See [`Looper::start`]; `Disconnected` if the owner is gone.
    pub fn start(&self) -> Result<(), SchedulerError> {
        self.request(Command::Start)?
    }

    /// Stop the looper. A pending completion still fires.
    ///
    /// # Errors
    ///
    /// `Disconnected` if the owner is gone.
    pub fn stop(&self) -> Result<bool, SchedulerError> {
        self.request(Command::Stop)
    }

    /// Submit from the default handler.
    ///
    /// # Errors
    ///
    /// `Disconnected` if the owner is gone.
    pub fn submit(&self, kind: u32, delay_ms: u64, from_pool: bool) -> Result<WorkItem, SchedulerError> {
        let mut submission = Submission::new(kind).delayed(delay_ms);
        submission.from_pool = from_pool;
        self.post(submission)
    }

    /// Post a submission.
    ///
    /// # Errors
    ///
    /// `Disconnected` if the owner is gone.
    pub fn post(&self, submission: Submission) -> Result<WorkItem, SchedulerError> {
        self.request(|reply| Command::Post(submission, reply))
    }

    /// Change the recycle policy.
    ///
    /// # Errors
    ///
    /// `Disconnected` if the owner is gone.
    pub fn set_recycle_policy(&self, policy: RecyclePolicy) -> Result<(), SchedulerError> {
        self.commands
            .send(Command::SetRecycle(policy))
            .map_err(|_| SchedulerError::Disconnected)
    }

    /// Capture a snapshot on the owner thread.
    ///
    /// # Errors
    ///
    /// `Disconnected` if the owner is gone.
    pub fn snapshot(&self) -> Result<LooperSnapshot, SchedulerError> {
        self.request(Command::Snapshot)
    }

    /// Stop the owner thread and take the looper back. An item still in
    /// flight stays in flight on the returned looper.
    ///
    /// # Errors
    ///
    /// `Disconnected` if the owner thread panicked or already exited.
    pub fn shutdown(mut self) -> Result<Looper<Q>, SchedulerError> {
        let owner = self.owner.take().ok_or(SchedulerError::Disconnected)?;
        let _ = self.commands.send(Command::Shutdown);
        owner.join().map_err(|_| SchedulerError::Disconnected)
    }
}

impl<Q> Drop for ThreadHost<Q> {
    fn drop(&mut self) {
        // Don't join here; the owner exits on its own once it sees Shutdown.
        if self.owner.take().is_some() {
            let _ = self.commands.send(Command::Shutdown);
            debug!("ThreadHost dropped without shutdown - owner thread detached");
        }
    }
}

fn run_owner<Q: WorkQueue>(mut looper: Looper<Q>, inbox: &Receiver<Command>, clock: &dyn Clock) -> Looper<Q> {
    let poll = Duration::from_millis(looper.limits().poll_interval_ms.max(1));
    let processing = Duration::from_millis(looper.limits().processing_ms);
    let mut ticker: Receiver<Instant> = never();
    let mut completion: Receiver<Instant> = never();
    let mut pending: Option<ItemId> = None;

    info!(thread = looper.thread_name(), "looper owner thread started");

    loop {
        let wakeup = select! {
            recv(inbox) -> msg => Wakeup::Command(msg.ok()),
            recv(ticker) -> _ => Wakeup::Tick,
            recv(completion) -> _ => Wakeup::Completion,
        };

        match wakeup {
            Wakeup::Command(None | Some(Command::Shutdown)) => break,
            Wakeup::Command(Some(command)) => match command {
                Command::Prepare(reply) => {
                    let _ = reply.send(looper.prepare(clock.now_ms()));
                }
                Command::Start(reply) => {
                    let result = looper.start(clock.now_ms());
                    if result.is_ok() {
                        ticker = tick(poll);
                    }
                    let _ = reply.send(result);
                }
                Command::Stop(reply) => {
                    let stopped = looper.stop(clock.now_ms());
                    if stopped {
                        ticker = never();
                    }
                    let _ = reply.send(stopped);
                }
                Command::Post(submission, reply) => {
                    let _ = reply.send(looper.post(submission, clock.now_ms()));
                }
                Command::SetRecycle(policy) => looper.set_recycle_policy(policy),
                Command::Snapshot(reply) => {
                    let _ = reply.send(LooperSnapshot::capture(&looper));
                }
                Command::Shutdown => break,
            },
            Wakeup::Tick => {
                if let TickOutcome::Dispatched(item) = looper.tick(clock.now_ms()) {
                    pending = Some(item.id);
                    completion = after(processing);
                }
            }
            Wakeup::Completion => {
                completion = never();
                if let Some(item_id) = pending.take() {
                    let _ = looper.complete(item_id, clock.now_ms());
                }
            }
        }
    }

    if let Some(item_id) = pending {
        warn!(item_id, "owner thread exiting with an item in flight");
    }
    info!("looper owner thread exiting");
    looper
}
