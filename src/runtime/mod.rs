//! Hosts that drive a [`Looper`](crate::core::Looper) against a clock, plus
//! the snapshot surface they expose.

pub mod api;
pub mod spawn;
pub mod thread_host;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_host;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_spawner;
pub mod virtual_host;

pub use api::{LooperSnapshot, PoolSnapshot};
pub use spawn::Spawn;
pub use thread_host::ThreadHost;
#[cfg(feature = "tokio-runtime")]
pub use tokio_host::{Handler, TokioClock, TokioHost};
#[cfg(feature = "tokio-runtime")]
pub use tokio_spawner::TokioSpawner;
pub use virtual_host::{HostEvent, VirtualHost};
