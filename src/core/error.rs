//! Error types for looper operations.

use thiserror::Error;

/// Errors produced by the looper and its hosts.
///
/// Transition errors are non-fatal: the looper records a trace entry, leaves
/// its state untouched, and hands the error back so the caller can surface a
/// warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// `prepare()` called on a looper that is already prepared.
    #[error("looper already prepared")]
    AlreadyPrepared,
    /// `start()` called before `prepare()`.
    #[error("looper not prepared; call prepare() first")]
    NotPrepared,
    /// `start()` called on a looper that is already running.
    #[error("looper already running")]
    AlreadyRunning,
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The thread owning the looper is gone.
    #[error("looper owner disconnected")]
    Disconnected,
    /// The host could not start its owning thread.
    #[error("failed to spawn looper thread: {0}")]
    Spawn(String),
}

impl SchedulerError {
    /// Whether this error came from an illegal state transition.
    #[must_use]
    pub const fn is_transition(&self) -> bool {
        matches!(
            self,
            Self::AlreadyPrepared | Self::NotPrepared | Self::AlreadyRunning
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
