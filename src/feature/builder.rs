//! Builder for constructing features.

use crate::core::{Effect, Event, State};
use crate::dsl::Reduction;
use crate::feature::error::BuildError;
use crate::feature::reducer::{EffectsImplementation, Reducer};
use crate::feature::Feature;
use futures::Stream;

/// Builder for constructing features with a fluent API.
pub struct FeatureBuilder<S: State, Ev: Event, Ef: Effect> {
    reducer: Option<Reducer<S, Ev, Ef>>,
    effects: Option<EffectsImplementation<Ef, Ev>>,
}

impl<S: State, Ev: Event, Ef: Effect> FeatureBuilder<S, Ev, Ef> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            reducer: None,
            effects: None,
        }
    }

    /// Set the reducer using a closure (required).
    pub fn reducer<F>(mut self, reduce: F) -> Self
    where
        F: Fn(&S, Ev) -> Reduction<S, Ef> + Send + Sync + 'static,
    {
        self.reducer = Some(Reducer::new(reduce));
        self
    }

    /// Set the effects implementation using a closure (required).
    pub fn effects<F, St>(mut self, trigger: F) -> Self
    where
        F: Fn(Ef) -> St + Send + Sync + 'static,
        St: Stream<Item = Ev> + Send + 'static,
    {
        self.effects = Some(EffectsImplementation::new(trigger));
        self
    }

    /// Set a pre-built effects implementation.
    pub fn effects_implementation(mut self, effects: EffectsImplementation<Ef, Ev>) -> Self {
        self.effects = Some(effects);
        self
    }

    /// Declare that this feature never runs effects.
    pub fn without_effects(self) -> Self {
        self.effects_implementation(EffectsImplementation::none())
    }

    /// Build the feature.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Feature<S, Ev, Ef>, BuildError> {
        let reducer = self.reducer.ok_or(BuildError::MissingReducer)?;
        let effects = self.effects.ok_or(BuildError::MissingEffects)?;

        Ok(Feature::new(reducer, effects))
    }
}

impl<S: State, Ev: Event, Ef: Effect> Default for FeatureBuilder<S, Ev, Ef> {
    fn default() -> Self {
        Self::new()
    }
}
