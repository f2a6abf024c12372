//! Lifecycle of the dispatch loop.

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Lifecycle state of a looper.
///
/// `Stopped` behaves like `Prepared` for every transition; it only records
/// that the loop ran before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// `prepare()` has not been called.
    #[default]
    Uninitialized,
    /// Prepared, loop not started yet.
    Prepared,
    /// Loop is running; ticks may dispatch.
    Running,
    /// Loop was running and has been stopped.
    Stopped,
}

impl SchedulerState {
    /// Target state for `prepare()`.
    ///
    /// # Errors
    ///
    /// `AlreadyPrepared` from any state but `Uninitialized`.
    pub fn on_prepare(self) -> Result<Self, SchedulerError> {
        match self {
            Self::Uninitialized => Ok(Self::Prepared),
            Self::Prepared | Self::Running | Self::Stopped => Err(SchedulerError::AlreadyPrepared),
        }
    }

    /// Target state for `start()`.
    ///
    /// # Errors
    ///
    /// `NotPrepared` while uninitialized, `AlreadyRunning` while running.
    pub fn on_start(self) -> Result<Self, SchedulerError> {
        match self {
            Self::Prepared | Self::Stopped => Ok(Self::Running),
            Self::Uninitialized => Err(SchedulerError::NotPrepared),
            Self::Running => Err(SchedulerError::AlreadyRunning),
        }
    }

    /// Target state for `stop()`, or `None` when stopping is a no-op.
    #[must_use]
    pub const fn on_stop(self) -> Option<Self> {
        match self {
            Self::Running => Some(Self::Stopped),
            Self::Uninitialized | Self::Prepared | Self::Stopped => None,
        }
    }

    /// Whether ticks may dispatch work in this state.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether `prepare()` has succeeded at some point.
    #[must_use]
    pub const fn is_prepared(self) -> bool {
        !matches!(self, Self::Uninitialized)
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Prepared => "prepared",
            Self::Running => "running",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
