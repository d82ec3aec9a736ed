//! The command model: a pure description of what a reduction asks for.
//!
//! A reduction produces an ordered list of [`Command`] nodes and an optional
//! next state. Nothing here runs anything; [`Commands::apply`](super::algebra)
//! folds the nodes over a running set later.

use super::handle::EffectHandle;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Function that expands into more commands once the handle of the effect it
/// was attached to is known.
pub type ContinuationFn<S, Ef> = Box<dyn FnOnce(EffectHandle<Ef>) -> Commands<S, Ef>>;

/// A delta to apply to the running set.
///
/// When `cancel_all` is set it wins over the `cancel` list of the same node.
/// Triggers are applied after cancels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectsDiff<Ef: Eq + Hash> {
    pub(crate) cancel_all: bool,
    pub(crate) cancel: HashSet<EffectHandle<Ef>>,
    pub(crate) trigger: Vec<Ef>,
}

impl<Ef: Eq + Hash> EffectsDiff<Ef> {
    /// A diff that changes nothing.
    pub fn noop() -> Self {
        Self {
            cancel_all: false,
            cancel: HashSet::new(),
            trigger: Vec::new(),
        }
    }

    pub fn cancel_all() -> Self {
        Self {
            cancel_all: true,
            ..Self::noop()
        }
    }

    pub fn cancel(handles: impl IntoIterator<Item = EffectHandle<Ef>>) -> Self {
        Self {
            cancel: handles.into_iter().collect(),
            ..Self::noop()
        }
    }

    pub fn trigger(effects: impl IntoIterator<Item = Ef>) -> Self {
        Self {
            trigger: effects.into_iter().collect(),
            ..Self::noop()
        }
    }

    pub fn cancels_all(&self) -> bool {
        self.cancel_all
    }

    pub fn cancelled(&self) -> &HashSet<EffectHandle<Ef>> {
        &self.cancel
    }

    pub fn triggered(&self) -> &[Ef] {
        &self.trigger
    }
}

impl<Ef: Eq + Hash> Default for EffectsDiff<Ef> {
    fn default() -> Self {
        Self::noop()
    }
}

/// One node of a command list.
pub enum Command<S, Ef: Eq + Hash> {
    /// Cancel and/or trigger effects.
    EffectsDiff(EffectsDiff<Ef>),

    /// Trigger `effect` with its handle assigned up front, then expand
    /// `continuation(handle)` in place.
    Continuation {
        effect: Ef,
        continuation: ContinuationFn<S, Ef>,
    },
}

impl<S, Ef: Eq + Hash + fmt::Debug> fmt::Debug for Command<S, Ef> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EffectsDiff(diff) => f.debug_tuple("EffectsDiff").field(diff).finish(),
            Self::Continuation { effect, .. } => f
                .debug_struct("Continuation")
                .field("effect", effect)
                .finish_non_exhaustive(),
        }
    }
}

/// Ordered commands plus an optional explicit next state.
///
/// Values are immutable in spirit: every builder method consumes `self` and
/// returns the extended list.
pub struct Commands<S, Ef: Eq + Hash> {
    pub(crate) commands: Vec<Command<S, Ef>>,
    pub(crate) state: Option<S>,
}

impl<S, Ef: Eq + Hash> Commands<S, Ef> {
    /// No commands and no next state.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            state: None,
        }
    }

    pub fn cancel_all_effects(self) -> Self {
        self.appending(Command::EffectsDiff(EffectsDiff::cancel_all()))
    }

    pub fn cancel(self, handles: impl IntoIterator<Item = EffectHandle<Ef>>) -> Self {
        self.appending(Command::EffectsDiff(EffectsDiff::cancel(handles)))
    }

    pub fn trigger(self, effects: impl IntoIterator<Item = Ef>) -> Self {
        self.appending(Command::EffectsDiff(EffectsDiff::trigger(effects)))
    }

    pub fn trigger_with<F>(self, effect: Ef, continuation: F) -> Self
    where
        F: FnOnce(EffectHandle<Ef>) -> Commands<S, Ef> + 'static,
    {
        self.appending(Command::Continuation {
            effect,
            continuation: Box::new(continuation),
        })
    }

    /// Record the explicit next state, replacing any previous one in this list.
    pub fn set_state(mut self, state: S) -> Self {
        self.state = Some(state);
        self
    }

    /// The top-level next state, if any. Nested continuations are not consulted.
    pub fn state(&self) -> Option<&S> {
        self.state.as_ref()
    }

    pub fn commands(&self) -> &[Command<S, Ef>] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.state.is_none()
    }

    fn appending(mut self, command: Command<S, Ef>) -> Self {
        self.commands.push(command);
        self
    }
}

impl<S, Ef: Eq + Hash> Default for Commands<S, Ef> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: fmt::Debug, Ef: Eq + Hash + fmt::Debug> fmt::Debug for Commands<S, Ef> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commands")
            .field("commands", &self.commands)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestEffect {
        One,
        Two,
    }

    #[test]
    fn builder_appends_in_order() {
        let commands: Commands<(), TestEffect> = Commands::new()
            .cancel_all_effects()
            .trigger([TestEffect::One])
            .trigger_with(TestEffect::Two, |_| Commands::new());

        let nodes = commands.commands();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(&nodes[0], Command::EffectsDiff(d) if d.cancels_all()));
        assert!(matches!(&nodes[1], Command::EffectsDiff(d) if d.triggered() == [TestEffect::One]));
        assert!(matches!(&nodes[2], Command::Continuation { effect: TestEffect::Two, .. }));
    }

    #[test]
    fn set_state_does_not_touch_commands() {
        let commands: Commands<&str, TestEffect> = Commands::new().set_state("done");
        assert!(commands.commands().is_empty());
        assert_eq!(commands.state(), Some(&"done"));
        assert!(!commands.is_empty());
    }

    #[test]
    fn diff_constructors_fill_one_part() {
        let handle = EffectHandle::new(4, TestEffect::One);

        let cancel = EffectsDiff::cancel([handle.clone()]);
        assert!(!cancel.cancels_all());
        assert!(cancel.cancelled().contains(&handle));
        assert!(cancel.triggered().is_empty());

        let trigger = EffectsDiff::trigger([TestEffect::Two, TestEffect::One]);
        assert_eq!(trigger.triggered(), &[TestEffect::Two, TestEffect::One]);
        assert!(trigger.cancelled().is_empty());

        assert!(EffectsDiff::<TestEffect>::cancel_all().cancels_all());
        assert_eq!(EffectsDiff::<TestEffect>::default(), EffectsDiff::noop());
    }

    #[test]
    fn debug_skips_the_closure() {
        let commands: Commands<(), TestEffect> =
            Commands::new().trigger_with(TestEffect::One, |_| Commands::new());
        let printed = format!("{commands:?}");
        assert!(printed.contains("Continuation"));
        assert!(printed.contains("One"));
    }
}
