//! Effect handles and the registry that issues them.
//!
//! A handle binds one triggered instance of an effect to a unique id. The id
//! is what lets two identical effects run side by side as distinct tasks, and
//! what a feature stores in its state to cancel a specific instance later.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one triggered effect instance.
///
/// Two handles are equal iff both their id and their effect are equal.
///
/// # Example
///
/// ```rust
/// use sensor::core::EffectHandle;
///
/// let first = EffectHandle::new(0, "fetch");
/// let second = EffectHandle::new(1, "fetch");
///
/// assert_ne!(first, second);
/// assert_eq!(first.effect(), second.effect());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct EffectHandle<Ef> {
    id: u64,
    effect: Ef,
}

impl<Ef> EffectHandle<Ef> {
    /// Build a handle from its parts.
    ///
    /// Normally handles come from a [`HandleRegistry`]; building one by hand
    /// is useful in tests to describe an expected running set.
    pub fn new(id: u64, effect: Ef) -> Self {
        Self { id, effect }
    }

    /// The id issued by the registry, unique per scheduler.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The effect this handle was triggered for.
    pub fn effect(&self) -> &Ef {
        &self.effect
    }

    /// Consume the handle, keeping only the effect.
    pub fn into_effect(self) -> Ef {
        self.effect
    }
}

impl<Ef: fmt::Debug> fmt::Display for EffectHandle<Ef> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {:?}", self.id, self.effect)
    }
}

/// Monotonic id source for effect handles.
///
/// One registry belongs to one scheduler instance. Ids start at zero, grow by
/// one per allocation and are never handed out twice, even after the handle
/// that carried them has been cancelled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HandleRegistry {
    next_id: u64,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh handle for `effect`.
    pub fn allocate<Ef>(&mut self, effect: Ef) -> EffectHandle<Ef> {
        let handle = EffectHandle::new(self.next_id, effect);
        self.next_id += 1;
        handle
    }

    /// The id the next allocation will receive.
    ///
    /// Equals the number of handles allocated so far.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestEffect {
        Fetch,
        Timer { seconds: u64 },
    }

    #[test]
    fn registry_starts_at_zero() {
        let mut registry = HandleRegistry::new();
        assert_eq!(registry.next_id(), 0);

        let handle = registry.allocate(TestEffect::Fetch);
        assert_eq!(handle.id(), 0);
        assert_eq!(registry.next_id(), 1);
    }

    #[test]
    fn identical_effects_get_distinct_handles() {
        let mut registry = HandleRegistry::new();
        let first = registry.allocate(TestEffect::Fetch);
        let second = registry.allocate(TestEffect::Fetch);

        assert_ne!(first, second);
        assert_eq!(first.effect(), second.effect());

        let set: HashSet<_> = [first, second].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn equality_requires_id_and_effect() {
        let a = EffectHandle::new(3, TestEffect::Fetch);
        let b = EffectHandle::new(3, TestEffect::Timer { seconds: 1 });
        let c = EffectHandle::new(3, TestEffect::Fetch);

        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn display_shows_id_and_effect() {
        let handle = EffectHandle::new(7, TestEffect::Timer { seconds: 5 });
        assert_eq!(handle.to_string(), "#7 Timer { seconds: 5 }");
    }

    #[test]
    fn handle_serializes_correctly() {
        let handle = EffectHandle::new(2, TestEffect::Timer { seconds: 30 });
        let json = serde_json::to_string(&handle).unwrap();
        let deserialized: EffectHandle<TestEffect> = serde_json::from_str(&json).unwrap();
        assert_eq!(handle, deserialized);
    }

    #[test]
    fn into_effect_returns_the_effect() {
        let handle = EffectHandle::new(0, TestEffect::Fetch);
        assert_eq!(handle.into_effect(), TestEffect::Fetch);
    }
}
