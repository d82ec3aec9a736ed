//! Set differences between successive running sets.

use super::algebra::RunningSet;
use super::handle::EffectHandle;
use std::hash::Hash;

/// Handles to start and handles to stop after one reduction.
///
/// Identity is the whole handle, so two handles carrying equal effects but
/// different ids are different tasks. Neither list has a meaningful order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunningSetDiff<Ef> {
    pub started: Vec<EffectHandle<Ef>>,
    pub stopped: Vec<EffectHandle<Ef>>,
}

impl<Ef: Clone + Eq + Hash> RunningSetDiff<Ef> {
    /// `started = next - previous`, `stopped = previous - next`.
    pub fn between(previous: &RunningSet<Ef>, next: &RunningSet<Ef>) -> Self {
        Self {
            started: next.difference(previous).cloned().collect(),
            stopped: previous.difference(next).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.stopped.is_empty()
    }

    pub fn started_set(&self) -> RunningSet<Ef> {
        self.started.iter().cloned().collect()
    }
}
