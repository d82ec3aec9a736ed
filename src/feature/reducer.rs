//! The two functions a feature author supplies.

use crate::dsl::Reduction;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

/// Stream of events produced by one running effect.
pub type EffectStream<Ev> = BoxStream<'static, Ev>;

/// Type alias for reducer functions.
pub type ReduceFn<S, Ev, Ef> = Arc<dyn Fn(&S, Ev) -> Reduction<S, Ef> + Send + Sync>;

/// Type alias for effect implementations.
pub type TriggerFn<Ef, Ev> = Arc<dyn Fn(Ef) -> EffectStream<Ev> + Send + Sync>;

/// Pure transition function `(state, event) -> reduction`.
///
/// The reducer must be total: an event it does not care about still returns
/// a reduction, usually [`stay_on_current_state`](crate::dsl::stay_on_current_state).
/// It is never called concurrently with itself for one scheduler.
pub struct Reducer<S, Ev, Ef: Eq + Hash> {
    reduce: ReduceFn<S, Ev, Ef>,
}

impl<S, Ev, Ef: Eq + Hash> Reducer<S, Ev, Ef> {
    pub fn new<F>(reduce: F) -> Self
    where
        F: Fn(&S, Ev) -> Reduction<S, Ef> + Send + Sync + 'static,
    {
        Self {
            reduce: Arc::new(reduce),
        }
    }

    pub fn reduce(&self, state: &S, event: Ev) -> Reduction<S, Ef> {
        (self.reduce)(state, event)
    }
}

impl<S, Ev, Ef: Eq + Hash> Clone for Reducer<S, Ev, Ef> {
    fn clone(&self) -> Self {
        Self {
            reduce: Arc::clone(&self.reduce),
        }
    }
}

/// Turns an effect value into the stream of events its work produces.
///
/// Failures are reported as events of the feature's own choosing; the
/// stream has no error channel. Dropping the stream is how a running effect
/// is cancelled, so work should happen inside the stream, not before it is
/// returned.
pub struct EffectsImplementation<Ef, Ev> {
    trigger: TriggerFn<Ef, Ev>,
}

impl<Ef, Ev: Send + 'static> EffectsImplementation<Ef, Ev> {
    /// Build from a function returning any `Send` stream.
    pub fn new<F, St>(trigger: F) -> Self
    where
        F: Fn(Ef) -> St + Send + Sync + 'static,
        St: Stream<Item = Ev> + Send + 'static,
    {
        Self {
            trigger: Arc::new(move |effect| trigger(effect).boxed()),
        }
    }

    /// Build from an async function producing exactly one event per effect.
    pub fn from_async<F, Fut>(trigger: F) -> Self
    where
        F: Fn(Ef) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Ev> + Send + 'static,
    {
        Self::new(move |effect| stream::once(trigger(effect)))
    }

    /// Effects that never produce events.
    pub fn none() -> Self {
        Self::new(|_| stream::empty())
    }

    pub fn trigger(&self, effect: Ef) -> EffectStream<Ev> {
        (self.trigger)(effect)
    }
}

impl<Ef, Ev> Clone for EffectsImplementation<Ef, Ev> {
    fn clone(&self) -> Self {
        Self {
            trigger: Arc::clone(&self.trigger),
        }
    }
}
