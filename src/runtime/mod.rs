//! Runtime shell around the pure core.
//!
//! This module runs features: it owns the serialized reduction loop, starts
//! and cancels effect tasks as the running set changes, and publishes the
//! observables the rest of an application (and its tests) consume.
//!
//! # Key Concepts
//!
//! - **Scheduler**: one tokio task, the single writer of state and running set
//! - **SchedulerHandle**: cloneable client used to send events and subscribe
//! - **Outputs**: states, events, running effects and triggered effects
//!
//! Cancellation is cooperative. A task stops at its next await point once
//! its handle leaves the running set; an event it had already queued is
//! still reduced like any other.

mod config;
mod error;
mod outputs;
mod scheduler;
mod tasks;

pub use config::SchedulerConfig;
pub use error::SchedulerError;
pub use outputs::{Outputs, Subscription};
pub use scheduler::{Scheduler, SchedulerHandle};
