//! # Campfire Looper
//!
//! A tick-driven looper/handler dispatch engine: one consumer draining a
//! time-ordered work queue, fed by any number of producers, with a bounded
//! pool of reusable work items.
//!
//! ## Core Model
//!
//! - **Looper**: a plain state-and-operations object. It never reads a clock
//!   or spawns timers; every operation takes the current time explicitly.
//! - **Work queue**: strictly a time axis. Items leave in non-decreasing
//!   `scheduled_at_ms` order, ties in submission order.
//! - **Item pool**: a bounded counter of reusable slots. An empty pool falls
//!   back to fresh allocation instead of failing.
//! - **Serial dispatch**: at most one item is in flight. A tick that finds
//!   an item in flight does nothing.
//! - **Trace log**: newest-first, bounded record of every transition,
//!   insertion, dispatch, and completion.
//!
//! ## Hosts
//!
//! The engine is driven by a host that owns the clock:
//!
//! - [`runtime::VirtualHost`] advances virtual time deterministically.
//! - [`runtime::TokioHost`] keeps the looper behind a mutex and ticks it from
//!   a tokio interval task.
//! - [`runtime::ThreadHost`] moves the looper onto its own OS thread and
//!   talks to it over channels.
//!
//! ```rust
//! use campfire_looper::core::Looper;
//! use campfire_looper::runtime::VirtualHost;
//!
//! let mut host = VirtualHost::new(Looper::with_defaults(), 0);
//! host.prepare()?;
//! host.start()?;
//! let item = host.submit(5, 0, false);
//!
//! host.advance_by(500);
//! assert_eq!(host.looper().in_flight().map(|i| i.id), Some(item.id));
//!
//! host.advance_by(800);
//! assert!(host.looper().in_flight().is_none());
//! # Ok::<(), campfire_looper::core::SchedulerError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Engine: lifecycle, items, pool, queue contract, trace log, and the looper.
pub mod core;
/// Configuration models for loopers and the assistant.
pub mod config;
/// Builders to construct loopers from configuration.
pub mod builders;
/// Work queue backends.
pub mod infra;
/// Hosts that drive a looper, plus snapshot models.
pub mod runtime;
/// Shared utilities.
pub mod util;
/// Curriculum topics and their effect on the recycle policy.
pub mod catalog;
/// Conversational assistant collaborator.
pub mod assistant;
