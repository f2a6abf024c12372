//! Configuration models for the looper and the assistant collaborator.

pub mod assistant;
pub mod looper;

pub use assistant::AssistantConfig;
pub use looper::{LooperConfig, PoolConfig};
