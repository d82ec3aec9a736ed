//! Fluent DSL reducers use to describe effects and the next state.
//!
//! The chain is typestate-checked so a reducer can only return a finished
//! [`Reduction`], which always says what happens to the state: either
//! [`go_to`](Then::go_to) a new one or
//! [`stay_on_current_state`](Then::stay_on_current_state).
//!
//! ```text
//! then() ── cancel_all_effects / cancel ──► Then
//!   │
//!   ├── trigger ───────────────────────────► Triggered ── trigger ──► Triggered
//!   │                                          │
//!   └── go_to / stay_on_current_state ──────►  └── go_to / stay ──► Reduction
//! ```
//!
//! Cancels come before triggers in a single chain. To cancel something in a
//! continuation, start the continuation with `then()`.
//!
//! # Example
//!
//! ```rust
//! use sensor::dsl::{then, stay_on_current_state, Reduction};
//! use sensor::core::EffectHandle;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Search {
//!     query: String,
//!     request: Option<EffectHandle<Effect>>,
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Effect {
//!     Query(String),
//! }
//!
//! #[derive(Clone, Debug)]
//! enum Event {
//!     Typed(String),
//!     Cleared,
//! }
//!
//! fn reduce(state: &Search, event: Event) -> Reduction<Search, Effect> {
//!     match event {
//!         Event::Typed(query) => {
//!             let previous = state.request.clone();
//!             then()
//!                 .cancel(previous)
//!                 .trigger_with(Effect::Query(query.clone()), move |handle| {
//!                     then().go_to(Search { query, request: Some(handle) })
//!                 })
//!         }
//!         Event::Cleared => stay_on_current_state(),
//!     }
//! }
//! # let _ = reduce(&Search { query: String::new(), request: None }, Event::Cleared);
//! ```

use crate::core::{Commands, EffectHandle};
use std::hash::Hash;

mod private {
    pub trait Sealed {}
}

/// Start a reduction chain.
pub fn then<S, Ef: Eq + Hash>() -> Then<S, Ef> {
    Then {
        commands: Commands::new(),
    }
}

/// Keep the current state and touch no effects.
pub fn stay_on_current_state<S, Ef: Eq + Hash>() -> Reduction<S, Ef> {
    Reduction {
        commands: Commands::new(),
    }
}

/// Start of a chain: cancels, triggers and the final state are all allowed.
#[must_use = "a chain without go_to or stay_on_current_state does nothing"]
pub struct Then<S, Ef: Eq + Hash> {
    commands: Commands<S, Ef>,
}

/// A chain that has triggered effects; no more cancels allowed.
#[must_use = "a chain without go_to or stay_on_current_state does nothing"]
pub struct Triggered<S, Ef: Eq + Hash> {
    commands: Commands<S, Ef>,
}

/// A finished chain. This is what a reducer returns.
#[must_use]
pub struct Reduction<S, Ef: Eq + Hash> {
    commands: Commands<S, Ef>,
}

/// What a [`trigger_with`](Then::trigger_with) continuation may return.
///
/// A continuation returning [`Triggered`] keeps the outer chain open; one
/// returning [`Reduction`] finishes it, since the continuation already
/// decided about the state.
pub trait Continuation<S, Ef: Eq + Hash>: private::Sealed {
    /// The chain type `trigger_with` hands back.
    type Chain;

    fn into_commands(self) -> Commands<S, Ef>;

    #[doc(hidden)]
    fn chain(commands: Commands<S, Ef>) -> Self::Chain;
}

impl<S, Ef: Eq + Hash> Then<S, Ef> {
    /// Cancel every running effect at this point of the chain.
    pub fn cancel_all_effects(self) -> Self {
        Self {
            commands: self.commands.cancel_all_effects(),
        }
    }

    /// Cancel specific handles.
    ///
    /// Accepts handles or optional handles; `None` entries are skipped, so a
    /// handle field that was never filled in can be passed as is. Handles
    /// that are not running are ignored.
    pub fn cancel<I, H>(self, handles: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<Option<EffectHandle<Ef>>>,
    {
        Self {
            commands: self
                .commands
                .cancel(handles.into_iter().filter_map(Into::into)),
        }
    }

    /// Start these effects, each with a fresh handle.
    pub fn trigger(self, effects: impl IntoIterator<Item = Ef>) -> Triggered<S, Ef> {
        Triggered {
            commands: self.commands.trigger(effects),
        }
    }

    /// Start `effect` and continue the chain with its handle.
    pub fn trigger_with<F, C>(self, effect: Ef, continuation: F) -> C::Chain
    where
        F: FnOnce(EffectHandle<Ef>) -> C + 'static,
        C: Continuation<S, Ef>,
    {
        C::chain(
            self.commands
                .trigger_with(effect, move |handle| continuation(handle).into_commands()),
        )
    }

    pub fn go_to(self, state: S) -> Reduction<S, Ef> {
        Reduction {
            commands: self.commands.set_state(state),
        }
    }

    pub fn stay_on_current_state(self) -> Reduction<S, Ef> {
        Reduction {
            commands: self.commands,
        }
    }
}

impl<S, Ef: Eq + Hash> Triggered<S, Ef> {
    pub fn trigger(self, effects: impl IntoIterator<Item = Ef>) -> Self {
        Self {
            commands: self.commands.trigger(effects),
        }
    }

    pub fn trigger_with<F, C>(self, effect: Ef, continuation: F) -> C::Chain
    where
        F: FnOnce(EffectHandle<Ef>) -> C + 'static,
        C: Continuation<S, Ef>,
    {
        C::chain(
            self.commands
                .trigger_with(effect, move |handle| continuation(handle).into_commands()),
        )
    }

    pub fn go_to(self, state: S) -> Reduction<S, Ef> {
        Reduction {
            commands: self.commands.set_state(state),
        }
    }

    pub fn stay_on_current_state(self) -> Reduction<S, Ef> {
        Reduction {
            commands: self.commands,
        }
    }
}

impl<S, Ef: Eq + Hash> Reduction<S, Ef> {
    /// Trigger one more effect after the state was decided.
    ///
    /// The continuation cannot set the state again.
    pub fn trigger_with<F>(self, effect: Ef, continuation: F) -> Self
    where
        F: FnOnce(EffectHandle<Ef>) -> Triggered<S, Ef> + 'static,
    {
        Self {
            commands: self
                .commands
                .trigger_with(effect, move |handle| continuation(handle).commands),
        }
    }

    pub fn into_commands(self) -> Commands<S, Ef> {
        self.commands
    }
}

impl<S, Ef: Eq + Hash> private::Sealed for Triggered<S, Ef> {}
impl<S, Ef: Eq + Hash> private::Sealed for Reduction<S, Ef> {}

impl<S, Ef: Eq + Hash> Continuation<S, Ef> for Triggered<S, Ef> {
    type Chain = Triggered<S, Ef>;

    fn into_commands(self) -> Commands<S, Ef> {
        self.commands
    }

    fn chain(commands: Commands<S, Ef>) -> Self::Chain {
        Triggered { commands }
    }
}

impl<S, Ef: Eq + Hash> Continuation<S, Ef> for Reduction<S, Ef> {
    type Chain = Reduction<S, Ef>;

    fn into_commands(self) -> Commands<S, Ef> {
        self.commands
    }

    fn chain(commands: Commands<S, Ef>) -> Self::Chain {
        Reduction { commands }
    }
}
