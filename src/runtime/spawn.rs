//! Spawning abstraction used by async hosts.

use std::future::Future;

/// Abstraction for spawning detached work on a runtime.
pub trait Spawn {
    /// Spawn a future to run to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
