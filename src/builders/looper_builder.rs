//! Builder assembling a [`Looper`] from [`LooperConfig`].

use crate::catalog::Topic;
use crate::config::LooperConfig;
use crate::core::{ItemHandler, Looper, SchedulerError, TraceSink, WorkQueue};
use crate::infra::InMemoryQueue;

/// Builder for a looper over any queue backend.
pub struct LooperBuilder<Q = InMemoryQueue> {
    config: LooperConfig,
    queue: Q,
    sink: Option<Box<dyn TraceSink>>,
    handler: Option<Box<dyn ItemHandler>>,
}

impl LooperBuilder<InMemoryQueue> {
    /// Start from `config` with the in-memory queue backend.
    #[must_use]
    pub fn new(config: LooperConfig) -> Self {
        Self::with_queue(config, InMemoryQueue::new())
    }
}

impl<Q> LooperBuilder<Q>
where
    Q: WorkQueue,
{
    /// Start from `config` with a custom queue backend.
    pub fn with_queue(config: LooperConfig, queue: Q) -> Self {
        Self {
            config,
            queue,
            sink: None,
            handler: None,
        }
    }

    /// Configuration being built from.
    #[must_use]
    pub const fn config(&self) -> &LooperConfig {
        &self.config
    }

    /// Mirror trace events into `sink`.
    #[must_use]
    pub fn trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Invoke `handler` for every dispatched item.
    #[must_use]
    pub fn handler(mut self, handler: impl ItemHandler + 'static) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Derive the recycle policy from the selected curriculum topic.
    #[must_use]
    pub fn for_topic(mut self, topic: &Topic) -> Self {
        self.config.recycle = topic.recycle_policy();
        self
    }

    /// Validate the configuration and build the looper.
    ///
    /// # Errors
    ///
    /// `SchedulerError::InvalidConfig` if validation fails.
    pub fn build(self) -> Result<Looper<Q>, SchedulerError> {
        self.config.validate().map_err(SchedulerError::InvalidConfig)?;

        let mut looper = Looper::new(self.config.limits(), self.queue)
            .with_thread_name(self.config.thread_name.clone())
            .with_recycle_policy(self.config.recycle);
        if let Some(sink) = self.sink {
            looper = looper.with_trace_sink(sink);
        }
        if let Some(handler) = self.handler {
            looper = looper.with_boxed_handler(handler);
        }
        Ok(looper)
    }
}

/// Build a looper over the in-memory queue straight from configuration.
///
/// # Errors
///
/// `SchedulerError::InvalidConfig` if validation fails.
pub fn build_looper(config: &LooperConfig) -> Result<Looper, SchedulerError> {
    LooperBuilder::new(config.clone()).build()
}
