//! Property-based tests for the effect-set algebra.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated running sets and reductions.

use proptest::prelude::*;
use sensor::core::{Commands, EffectHandle, HandleRegistry, RunningSet, RunningSetDiff};
use sensor::dsl::{stay_on_current_state, then};
use std::collections::HashSet;

/// Effects and states are plain bytes here; only identity matters.
type Effect = u8;
type State = u8;

/// Allocate one handle per effect, in order.
fn allocate(registry: &mut HandleRegistry, effects: &[Effect]) -> Vec<EffectHandle<Effect>> {
    effects.iter().map(|effect| registry.allocate(*effect)).collect()
}

/// A running set built from allocated handles, keeping those whose mask bit is set.
fn running_from(handles: &[EffectHandle<Effect>], keep: &[bool]) -> RunningSet<Effect> {
    handles
        .iter()
        .zip(keep.iter().chain(std::iter::repeat(&true)))
        .filter(|(_, keep)| **keep)
        .map(|(handle, _)| handle.clone())
        .collect()
}

/// One reduction step of a random program.
#[derive(Clone, Debug)]
struct Step {
    cancel_all: bool,
    cancel: Vec<usize>,
    trigger: Vec<Effect>,
}

prop_compose! {
    fn arbitrary_step()(
        cancel_all in prop::bool::weighted(0.2),
        cancel in prop::collection::vec(0usize..32, 0..4),
        trigger in prop::collection::vec(0u8..4, 0..4),
    ) -> Step {
        Step { cancel_all, cancel, trigger }
    }
}

impl Step {
    /// Turn this step into commands against the handles seen so far.
    fn commands(&self, seen: &[EffectHandle<Effect>]) -> Commands<State, Effect> {
        let cancelled = self
            .cancel
            .iter()
            .filter_map(|index| seen.get(*index).cloned());
        let mut commands = Commands::new();
        if self.cancel_all {
            commands = commands.cancel_all_effects();
        }
        commands.cancel(cancelled).trigger(self.trigger.clone())
    }
}

/// Commands whose nested continuations may each assign a state.
fn nested_assignments(top: Option<State>, nested: &[Option<State>]) -> Commands<State, Effect> {
    let mut commands = Commands::new();
    for (index, state) in nested.iter().copied().enumerate() {
        commands = commands.trigger_with(index as Effect, move |_| match state {
            Some(state) => Commands::new().set_state(state),
            None => Commands::new(),
        });
    }
    match top {
        Some(state) => commands.set_state(state),
        None => commands,
    }
}

proptest! {
    #[test]
    fn handle_ids_are_never_reused(steps in prop::collection::vec(arbitrary_step(), 1..12)) {
        let mut registry = HandleRegistry::new();
        let mut running = RunningSet::new();
        let mut seen: Vec<EffectHandle<Effect>> = Vec::new();

        for step in &steps {
            let previous = running.clone();
            running = step.commands(&seen).apply(previous.clone(), &mut registry).running;
            let diff = RunningSetDiff::between(&previous, &running);
            seen.extend(diff.started);
        }

        let ids: HashSet<u64> = seen.iter().map(EffectHandle::id).collect();
        prop_assert_eq!(ids.len(), seen.len());
        prop_assert_eq!(seen.len() as u64, registry.next_id());

        let triggered: usize = steps.iter().map(|step| step.trigger.len()).sum();
        prop_assert_eq!(triggered, seen.len());
    }

    #[test]
    fn diff_reconstructs_both_sets(
        effects in prop::collection::vec(0u8..4, 0..16),
        keep_previous in prop::collection::vec(any::<bool>(), 16),
        keep_next in prop::collection::vec(any::<bool>(), 16),
    ) {
        let mut registry = HandleRegistry::new();
        let handles = allocate(&mut registry, &effects);
        let previous = running_from(&handles, &keep_previous);
        let next = running_from(&handles, &keep_next);

        let diff = RunningSetDiff::between(&previous, &next);
        let started: RunningSet<Effect> = diff.started.iter().cloned().collect();
        let stopped: RunningSet<Effect> = diff.stopped.iter().cloned().collect();
        let kept: RunningSet<Effect> = previous.intersection(&next).cloned().collect();

        prop_assert!(started.is_disjoint(&previous));
        prop_assert!(stopped.is_disjoint(&next));
        prop_assert_eq!(&started | &kept, next);
        prop_assert_eq!(&stopped | &kept, previous);
    }

    #[test]
    fn cancel_all_leaves_only_fresh_handles(
        effects in prop::collection::vec(0u8..4, 0..8),
        cancel in prop::collection::vec(0usize..8, 0..4),
        trigger in prop::collection::vec(0u8..4, 0..5),
    ) {
        let mut registry = HandleRegistry::new();
        let handles = allocate(&mut registry, &effects);
        let previous: RunningSet<Effect> = handles.iter().cloned().collect();
        let first_fresh = registry.next_id();

        let step = Step { cancel_all: true, cancel, trigger: trigger.clone() };
        let applied = step.commands(&handles).apply(previous, &mut registry);

        prop_assert_eq!(applied.running.len(), trigger.len());
        for handle in &applied.running {
            prop_assert!(handle.id() >= first_fresh);
        }
        let mut fresh: Vec<Effect> = applied.running.iter().map(|h| *h.effect()).collect();
        let mut expected = trigger;
        fresh.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(fresh, expected);
    }

    #[test]
    fn untouched_handles_are_not_restarted(
        effects in prop::collection::vec(0u8..4, 0..8),
        cancel in prop::collection::vec(0usize..8, 0..4),
        trigger in prop::collection::vec(0u8..4, 0..5),
    ) {
        let mut registry = HandleRegistry::new();
        let handles = allocate(&mut registry, &effects);
        let previous: RunningSet<Effect> = handles.iter().cloned().collect();
        let first_fresh = registry.next_id();

        let step = Step { cancel_all: false, cancel: cancel.clone(), trigger };
        let next = step.commands(&handles).apply(previous.clone(), &mut registry).running;
        let diff = RunningSetDiff::between(&previous, &next);

        let cancelled: RunningSet<Effect> = cancel
            .iter()
            .filter_map(|index| handles.get(*index).cloned())
            .collect();
        let stopped: RunningSet<Effect> = diff.stopped.iter().cloned().collect();
        prop_assert_eq!(stopped, cancelled.clone());

        for handle in previous.difference(&cancelled) {
            prop_assert!(next.contains(handle));
        }
        for handle in &diff.started {
            prop_assert!(handle.id() >= first_fresh);
        }
    }

    #[test]
    fn first_state_assignment_wins(
        top in prop::option::of(any::<u8>()),
        nested in prop::collection::vec(prop::option::of(any::<u8>()), 0..5),
    ) {
        let mut registry = HandleRegistry::new();
        let applied = nested_assignments(top, &nested).apply(RunningSet::new(), &mut registry);

        let expected = top.or_else(|| nested.iter().copied().flatten().next());
        prop_assert_eq!(applied.next_state, expected);
        prop_assert_eq!(applied.running.len(), nested.len());
    }

    #[test]
    fn staying_changes_nothing(
        effects in prop::collection::vec(0u8..4, 0..8),
        state in any::<u8>(),
    ) {
        let mut registry = HandleRegistry::new();
        let handles = allocate(&mut registry, &effects);
        let previous: RunningSet<Effect> = handles.into_iter().collect();
        let before = registry.clone();

        let applied = stay_on_current_state::<State, Effect>()
            .into_commands()
            .apply(previous.clone(), &mut registry);
        prop_assert_eq!(applied.next_state, None);
        prop_assert_eq!(&applied.running, &previous);
        prop_assert_eq!(&registry, &before);

        let applied = then::<State, Effect>()
            .go_to(state)
            .into_commands()
            .apply(previous.clone(), &mut registry);
        prop_assert_eq!(applied.state_or(0), (state, previous));
    }
}
