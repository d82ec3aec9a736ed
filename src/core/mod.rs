//! Pure core of the engine.
//!
//! This module contains everything that does not touch a runtime:
//! - Role bounds for feature-defined state, event and effect types
//! - Effect handles and the registry that issues their ids
//! - The command model produced by reducers
//! - The algebra that folds commands over a running set
//! - Set differences between successive running sets
//!
//! All logic in this module is deterministic. The scheduler in
//! [`runtime`](crate::runtime) is the only place these pieces meet tasks.

mod algebra;
mod commands;
mod diff;
mod handle;
mod kinds;

pub use algebra::{Applied, RunningSet};
pub use commands::{Command, Commands, ContinuationFn, EffectsDiff};
pub use diff::RunningSetDiff;
pub use handle::{EffectHandle, HandleRegistry};
pub use kinds::{Effect, Event, State};
