//! Trait bounds for the three feature-defined roles: state, event and effect.
//!
//! The engine never inspects these values. It only clones, compares, hashes
//! and logs them, so each role is a bundle of std bounds with a blanket
//! implementation. Feature types never implement these traits by hand.

use std::fmt::Debug;
use std::hash::Hash;

/// A feature's logical state.
///
/// States are replaced on every reduction, never mutated in place.
///
/// # Required Traits
///
/// - `Clone`: the scheduler keeps the committed state and publishes copies
/// - `Debug`: states appear in diagnostics
/// - `Send` + `Sync`: the state lives on the scheduler task and is read from
///   other tasks through [`latest_state`](crate::runtime::SchedulerHandle::latest_state)
pub trait State: Clone + Debug + Send + Sync + 'static {}

impl<T> State for T where T: Clone + Debug + Send + Sync + 'static {}

/// Something that happened: user input or a result produced by an effect.
///
/// `Clone` is required because every processed event is also published on
/// the event observable.
pub trait Event: Clone + Debug + Send + 'static {}

impl<T> Event for T where T: Clone + Debug + Send + 'static {}

/// A description of side-effecting work. Describes *what* to do, never *how*.
///
/// Effects are hashed into the running set together with their handle id,
/// so they must support equality and hashing.
///
/// # Example
///
/// ```rust
/// use sensor::core::Effect;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Request {
///     Fetch { page: u32 },
///     Timer { seconds: u64 },
/// }
///
/// fn assert_effect<E: Effect>() {}
/// assert_effect::<Request>();
/// ```
pub trait Effect: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Effect for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum TestEffect {
        Load,
        Save(String),
    }

    fn is_state<S: State>(_: &S) -> bool {
        true
    }

    fn is_event<E: Event>(_: &E) -> bool {
        true
    }

    fn effects_in_set<E: Effect>(effects: Vec<E>) -> usize {
        effects.into_iter().collect::<HashSet<_>>().len()
    }

    #[test]
    fn plain_types_satisfy_roles() {
        assert!(is_state(&String::from("idle")));
        assert!(is_state(&(1u8, vec![2u8])));
        assert!(is_event(&42u32));
    }

    #[test]
    fn effects_are_hashable() {
        let count = effects_in_set(vec![
            TestEffect::Load,
            TestEffect::Load,
            TestEffect::Save("a".to_string()),
        ]);
        assert_eq!(count, 2);
    }
}
