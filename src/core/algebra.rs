//! Effect-set algebra: folding commands over a running set.
//!
//! Application is deterministic and pure apart from the id counter in the
//! [`HandleRegistry`], which only ever moves forward.

use super::commands::{Command, Commands, EffectsDiff};
use super::handle::{EffectHandle, HandleRegistry};
use std::collections::HashSet;
use std::hash::Hash;

/// Running set of effect handles: the tasks that should currently be alive.
pub type RunningSet<Ef> = HashSet<EffectHandle<Ef>>;

/// Outcome of applying [`Commands`] to a running set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied<S, Ef: Eq + Hash> {
    /// First state assignment found in command order, if any.
    pub next_state: Option<S>,
    pub running: RunningSet<Ef>,
}

impl<S, Ef: Eq + Hash> Applied<S, Ef> {
    /// Resolve the next state, falling back to `current` when no command
    /// assigned one.
    pub fn state_or(self, current: S) -> (S, RunningSet<Ef>) {
        (self.next_state.unwrap_or(current), self.running)
    }
}

impl<Ef: Eq + Hash> EffectsDiff<Ef> {
    /// Apply this diff in place: cancels first, then triggers.
    pub fn apply(self, running: &mut RunningSet<Ef>, registry: &mut HandleRegistry) {
        if self.cancel_all {
            running.clear();
        } else {
            for handle in &self.cancel {
                running.remove(handle);
            }
        }

        for effect in self.trigger {
            running.insert(registry.allocate(effect));
        }
    }
}

impl<S, Ef: Clone + Eq + Hash> Commands<S, Ef> {
    /// Fold these commands over `running`, in declaration order.
    ///
    /// A continuation's handle is inserted before its nested commands are
    /// expanded, so the nested commands see it as running. The top-level
    /// state wins over every nested one; among nested continuations the
    /// earliest assignment wins and is never overwritten.
    pub fn apply(self, running: RunningSet<Ef>, registry: &mut HandleRegistry) -> Applied<S, Ef> {
        let mut running = running;
        let mut next_state = self.state;

        for command in self.commands {
            match command {
                Command::EffectsDiff(diff) => diff.apply(&mut running, registry),
                Command::Continuation {
                    effect,
                    continuation,
                } => {
                    let handle = registry.allocate(effect);
                    running.insert(handle.clone());
                    let nested = continuation(handle).apply(running, registry);
                    running = nested.running;
                    if next_state.is_none() {
                        next_state = nested.next_state;
                    }
                }
            }
        }

        Applied {
            next_state,
            running,
        }
    }
}
