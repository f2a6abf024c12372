//! Infrastructure adapters: work queue backends.

pub mod queue;
pub use queue::InMemoryQueue;
pub use queue::SortedQueue;
