//! Queue backends.

pub mod memory;
pub mod sorted;

pub use memory::InMemoryQueue;
pub use sorted::SortedQueue;
