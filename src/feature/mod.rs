//! Feature packaging: a reducer plus an effects implementation.
//!
//! A feature is everything the engine needs to run a state machine except
//! its initial state. Features are cheap to clone; both functions sit
//! behind `Arc`s.
//!
//! # Example
//!
//! ```rust
//! use sensor::dsl::{stay_on_current_state, then};
//! use sensor::feature::FeatureBuilder;
//! use futures::stream;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum State {
//!     Idle,
//!     Loading,
//!     Loaded(u32),
//! }
//!
//! #[derive(Clone, Debug)]
//! enum Event {
//!     Load,
//!     Loaded(u32),
//! }
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Effect {
//!     Fetch,
//! }
//!
//! let feature = FeatureBuilder::new()
//!     .reducer(|state: &State, event: Event| match (state, event) {
//!         (State::Idle, Event::Load) => then().trigger([Effect::Fetch]).go_to(State::Loading),
//!         (State::Loading, Event::Loaded(n)) => then().go_to(State::Loaded(n)),
//!         _ => stay_on_current_state(),
//!     })
//!     .effects(|effect: Effect| match effect {
//!         Effect::Fetch => stream::once(async { Event::Loaded(42) }),
//!     })
//!     .build()
//!     .unwrap();
//! # let _ = feature;
//! ```

pub mod builder;
pub mod error;
pub mod reducer;

pub use builder::FeatureBuilder;
pub use error::BuildError;
pub use reducer::{EffectStream, EffectsImplementation, Reducer};

use crate::core::{Effect, Event, State};
use crate::dsl::Reduction;
use crate::runtime::{Scheduler, SchedulerConfig, SchedulerHandle};

/// A reducer and the effects implementation it triggers.
pub struct Feature<S: State, Ev: Event, Ef: Effect> {
    reducer: Reducer<S, Ev, Ef>,
    effects: EffectsImplementation<Ef, Ev>,
}

impl<S: State, Ev: Event, Ef: Effect> Feature<S, Ev, Ef> {
    pub fn new(reducer: Reducer<S, Ev, Ef>, effects: EffectsImplementation<Ef, Ev>) -> Self {
        Self { reducer, effects }
    }

    pub fn builder() -> FeatureBuilder<S, Ev, Ef> {
        FeatureBuilder::new()
    }

    pub fn reducer(&self) -> &Reducer<S, Ev, Ef> {
        &self.reducer
    }

    pub fn effects(&self) -> &EffectsImplementation<Ef, Ev> {
        &self.effects
    }

    /// Run the reducer alone (pure).
    pub fn reduce(&self, state: &S, event: Ev) -> Reduction<S, Ef> {
        self.reducer.reduce(state, event)
    }

    /// Start a scheduler for this feature with the default configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, initial_state: S) -> SchedulerHandle<S, Ev, Ef> {
        self.spawn_with(initial_state, SchedulerConfig::default())
    }

    /// Start a scheduler for this feature.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_with(&self, initial_state: S, config: SchedulerConfig) -> SchedulerHandle<S, Ev, Ef> {
        Scheduler::spawn(self.clone(), initial_state, config)
    }
}

impl<S: State, Ev: Event, Ef: Effect> Clone for Feature<S, Ev, Ef> {
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            effects: self.effects.clone(),
        }
    }
}
