//! Property-based tests for the combat engine.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use ship_combat::battle::{BattleState, DamageSource, FullState, SessionState};
use ship_combat::boarding::{resolve_boarding_action, BoardingOutcome};
use ship_combat::critical::{calculate_severity, triggers_sustained_damage};
use ship_combat::dice::{roll, validate_roll};
use ship_combat::missile::MissileTracker;
use ship_combat::{CombatError, Combatant};

fn session_in(state: SessionState, contacts: Vec<Combatant>) -> BattleState {
    let mut battle = BattleState::new();
    battle
        .restore_full_state(FullState {
            state,
            version: 0,
            ship: None,
            contacts,
            missiles: MissileTracker::new(),
            snapshot: None,
        })
        .unwrap();
    battle
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Damage never takes hull below zero and applies min(amount, hull).
    #[test]
    fn prop_damage_clamped(hull in 1u32..500, amount in 0i64..2_000) {
        let mut battle = session_in(
            SessionState::Combat,
            vec![Combatant::new("t", "Target", hull, 0)],
        );
        let event = battle
            .apply_damage(&"t".into(), amount, DamageSource::external("prop"))
            .unwrap();
        let expected = (amount as u32).min(hull);
        prop_assert_eq!(event.applied, expected);
        prop_assert_eq!(event.new_hull, hull - expected);
        prop_assert_eq!(event.destroyed, event.new_hull == 0);
    }

    /// Severity is one per started 10 points of damage, capped at 6.
    #[test]
    fn prop_severity_formula(damage in 1u32..10_000) {
        let expected = ((damage + 9) / 10).min(6);
        prop_assert_eq!(calculate_severity(damage), expected);
    }

    /// Seeded rolls re-derive from their seed and not from another.
    #[test]
    fn prop_seeded_rolls_validate(seed in any::<u64>(), count in 10u32..20, sides in 6u32..21) {
        let rolled = roll(count, sides, Some(seed)).unwrap();
        prop_assert!(rolled.dice().iter().all(|d| (1..=sides).contains(d)));
        prop_assert!(validate_roll(&rolled, seed));
        prop_assert!(!validate_roll(&rolled, seed.wrapping_add(1)));
    }

    /// Illegal transitions fail and leave state and version alone.
    #[test]
    fn prop_illegal_transitions_rejected(from in 0usize..5, to in 0usize..5) {
        let from = SessionState::all()[from];
        let to = SessionState::all()[to];
        prop_assume!(!from.can_transition_to(to));

        let mut battle = session_in(from, Vec::new());
        let version = battle.version();
        let err = battle.transition(to).unwrap_err();
        prop_assert_eq!(err, CombatError::InvalidTransition { from, to });
        prop_assert_eq!(battle.state(), from);
        prop_assert_eq!(battle.version(), version);
    }

    /// Snapshot then reset restores hull and criticals regardless of the damage in between.
    #[test]
    fn prop_snapshot_reset_round_trip(hits in proptest::collection::vec(0i64..40, 1..10)) {
        let mut battle = session_in(
            SessionState::Combat,
            vec![
                Combatant::new("a", "Alpha", 120, 2),
                Combatant::new("b", "Bravo", 60, 0),
            ],
        );
        battle.create_snapshot().unwrap();
        let captured = battle.contacts().to_vec();

        for (i, amount) in hits.iter().enumerate() {
            let id = if i % 2 == 0 { "a" } else { "b" };
            battle
                .apply_damage(&id.into(), *amount, DamageSource::external("prop"))
                .unwrap();
        }

        battle.reset().unwrap();
        prop_assert_eq!(battle.contacts(), captured.as_slice());
        prop_assert_eq!(battle.state(), SessionState::DrillActive);
    }

    /// The boarding table is driven by the difference alone.
    #[test]
    fn prop_boarding_action_by_diff(attacker in -10i32..30, defender in -10i32..30) {
        let action = resolve_boarding_action(attacker, defender);
        let diff = attacker - defender;
        prop_assert_eq!(action.diff, diff);
        let expected = match diff {
            d if d <= -6 => BoardingOutcome::AttackersDefeated,
            d if d <= -3 => BoardingOutcome::AttackersRetreat,
            d if d <= 2 => BoardingOutcome::FightingContinues,
            d if d <= 5 => BoardingOutcome::Success,
            _ => BoardingOutcome::ImmediateControl,
        };
        prop_assert_eq!(action.outcome, expected);
        prop_assert_eq!(action.rounds_to_control.is_some(), diff >= 3);
    }

    /// A sustained-damage crit fires exactly when a new 10% chunk is lost.
    #[test]
    fn prop_sustained_damage_chunks(max in 10u32..1_000, before in 0u32..1_000, hit in 0u32..1_000) {
        let previous = before.min(max);
        let current = previous.saturating_sub(hit);
        let chunk = |hull: u32| (u64::from(max - hull) * 10) / u64::from(max);
        prop_assert_eq!(
            triggers_sustained_damage(current, max, previous),
            chunk(current) > chunk(previous)
        );
    }
}
