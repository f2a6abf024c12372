//! Builders to construct loopers from configuration.

pub mod looper_builder;

pub use looper_builder::{build_looper, LooperBuilder};
