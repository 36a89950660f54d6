//! End-to-end session flows: drills, live combat, missiles, boarding, persistence.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

use ship_combat::battle::{BattleState, DamageSource, FullState, SessionState};
use ship_combat::boarding::{BoardingForce, BoardingOutcome, BoardingParams, Resistance};
use ship_combat::combatant::{Combatant, CrewMember, CrewRole, Weapon};
use ship_combat::config::SessionConfig;
use ship_combat::missile::{MissileStatus, PointDefense, TurretSize};
use ship_combat::{AttackOptions, CombatError, Disposition, RangeBand, SystemLocation};

fn corvette() -> Combatant {
    Combatant::new("corvette", "Patrol Corvette", 160, 4)
        .with_disposition(Disposition::Friendly)
        .with_weapon(Weapon::pulse_laser())
        .with_weapon(Weapon::missile_rack(6))
        .with_fire_control(1)
        .with_power(120)
        .with_crew(CrewMember::new("Vance", CrewRole::Captain, 2, 8))
        .with_crew(CrewMember::new("Imre", CrewRole::Gunner, 2, 7))
        .with_crew(CrewMember::new("Tash", CrewRole::Engineer, 1, 7))
        .with_crew(CrewMember::new("Okonkwo", CrewRole::Marine, 2, 9))
        .with_crew(CrewMember::new("Reyes", CrewRole::Marine, 1, 8))
}

fn corsair() -> Combatant {
    Combatant::new("corsair", "Corsair", 100, 2)
        .with_disposition(Disposition::Hostile)
        .with_weapon(Weapon::beam_laser())
        .with_power(80)
        .with_crew(CrewMember::new("Deckhand", CrewRole::Crew, 0, 6))
        .with_crew(CrewMember::new("Deckhand", CrewRole::Crew, 0, 6))
        .with_crew(CrewMember::new("Bosun", CrewRole::Crew, 1, 7))
}

fn drill() -> BattleState {
    let mut battle = BattleState::new();
    battle.begin_drill().unwrap();
    battle.load_ship(corvette()).unwrap();
    battle.add_contact(corsair()).unwrap();
    battle.activate_drill().unwrap();
    battle
}

#[test]
fn drill_can_be_replayed_from_its_start() {
    let mut battle = drill();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let start = battle.full_state();

    let options = AttackOptions::at_range(RangeBand::Short).with_extra_dm(6);
    for _ in 0..3 {
        battle
            .fire_weapon(&"corvette".into(), "Pulse Laser", &"corsair".into(), &options, &mut rng)
            .unwrap();
    }
    battle
        .apply_critical(&"corvette".into(), SystemLocation::Sensors, 2, &mut rng)
        .unwrap();
    assert!(battle.combatant(&"corsair".into()).unwrap().hull < 100);

    battle.reset().unwrap();
    assert_eq!(battle.state(), SessionState::DrillActive);
    assert_eq!(battle.ship(), start.ship.as_ref());
    assert_eq!(battle.contacts(), start.contacts.as_slice());
    assert!(battle.version() > start.version);
}

#[test]
fn versions_and_events_line_up() {
    let mut battle = drill();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    battle.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    let before = battle.version();
    battle
        .apply_damage(&"corsair".into(), 12, DamageSource::external("collision"))
        .unwrap();
    battle
        .apply_damage(&"corvette".into(), 3, DamageSource::external("debris"))
        .unwrap();
    assert_eq!(battle.version(), before + 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].version, before + 1);
    assert_eq!(seen[0].new_hull, 88);
    assert_eq!(seen[1].version, before + 2);
    assert_eq!(seen[1].new_hull, 157);
}

#[test]
fn missile_salvo_against_point_defence() {
    let mut battle = BattleState::new();
    battle.load_ship(corvette()).unwrap();
    battle.add_contact(corsair()).unwrap();
    battle.start_combat().unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let options = AttackOptions::at_range(RangeBand::Long).with_extra_dm(8).in_round(1);

    let first = battle
        .fire_weapon(&"corvette".into(), "Missile Rack", &"corsair".into(), &options, &mut rng)
        .unwrap()
        .missile
        .unwrap();
    let second = battle
        .fire_weapon(&"corvette".into(), "Missile Rack", &"corsair".into(), &options, &mut rng)
        .unwrap()
        .missile
        .unwrap();
    let rack = battle.ship().unwrap().weapon("Missile Rack").unwrap();
    assert_eq!(rack.ammo_remaining, 4);
    assert_eq!(battle.missiles().inbound(&"corsair".into()).count(), 2);

    battle.advance_missiles(2, &mut rng).unwrap();
    let shot = PointDefense {
        gunner_skill: 8,
        turret: TurretSize::Double,
        round: 2,
    };
    assert!(battle.point_defense(first, shot, &mut rng).unwrap().intercepted);

    assert!(battle.advance_missiles(3, &mut rng).unwrap().is_empty());
    let impacts = battle.advance_missiles(4, &mut rng).unwrap();
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].missile_id, second);

    let missiles = battle.missiles();
    assert_eq!(missiles.get(first).unwrap().status, MissileStatus::Intercepted);
    assert_eq!(missiles.get(second).unwrap().status, MissileStatus::Impacted);
    let hull = battle.combatant(&"corsair".into()).unwrap().hull;
    let lost: u32 = impacts[0].event.applied
        + impacts[0]
            .criticals
            .iter()
            .map(|c| c.effect.hull_damage)
            .sum::<u32>();
    assert_eq!(hull, 100u32.saturating_sub(lost));

    assert_eq!(battle.cleanup_missiles(10), 2);
    assert!(battle.missiles().missiles().is_empty());
}

#[test]
fn drill_reset_grounds_missiles_in_flight() {
    let mut battle = drill();
    let mut rng = ChaCha8Rng::seed_from_u64(12);
    let options = AttackOptions::at_range(RangeBand::Short).with_extra_dm(8).in_round(1);
    let launched = battle
        .fire_weapon(&"corvette".into(), "Missile Rack", &"corsair".into(), &options, &mut rng)
        .unwrap();
    assert!(launched.missile.is_some());

    battle.reset().unwrap();
    assert!(battle.missiles().missiles().is_empty());
    assert!(battle.advance_missiles(2, &mut rng).unwrap().is_empty());
    assert_eq!(battle.combatant(&"corsair".into()).unwrap().hull, 100);
    assert_eq!(
        battle.ship().unwrap().weapon("Missile Rack").unwrap().ammo_remaining,
        6
    );
}

#[test]
fn boarding_a_crippled_corsair() {
    let mut battle = drill();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let params = BoardingParams {
        attacker: BoardingForce::from_combatant(battle.ship().unwrap(), 6, 2),
        defender: BoardingForce::from_combatant(battle.contacts().first().unwrap(), 0, 0),
        resistance: Resistance::Moderate,
    };

    let refused = battle
        .board(&"corvette".into(), &"corsair".into(), &params, &mut rng)
        .unwrap_err();
    assert!(matches!(refused, CombatError::NotBoardable(_)));

    battle
        .apply_damage(&"corsair".into(), 80, DamageSource::external("broadside"))
        .unwrap();
    let result = battle
        .board(&"corvette".into(), &"corsair".into(), &params, &mut rng)
        .unwrap();

    assert_eq!(result.margin, result.attacker_total - result.defender_total);
    assert_eq!(result.action.diff, result.margin);
    assert!(matches!(
        result.action.outcome,
        BoardingOutcome::AttackersDefeated
            | BoardingOutcome::AttackersRetreat
            | BoardingOutcome::FightingContinues
            | BoardingOutcome::Success
            | BoardingOutcome::ImmediateControl
    ));
    let defenders_left = battle.combatant(&"corsair".into()).unwrap().crew_count(None);
    assert_eq!(defenders_left, 3 - result.defender_casualties);
    let marines_left = battle.ship().unwrap().crew_count(Some(CrewRole::Marine));
    assert_eq!(marines_left, 2u32.saturating_sub(result.attacker_casualties));
}

#[test]
fn full_state_survives_json() {
    let mut battle = drill();
    battle
        .apply_critical(&"corsair".into(), SystemLocation::MDrive, 3, &mut ChaCha8Rng::seed_from_u64(1))
        .unwrap();
    let saved = battle.full_state();
    let json = saved.to_json().unwrap();

    let mut restored = BattleState::new();
    restored.restore_full_state(FullState::from_json(&json).unwrap()).unwrap();
    assert_eq!(restored.state(), SessionState::DrillActive);
    assert_eq!(restored.contacts(), saved.contacts.as_slice());
    assert!(restored.has_snapshot());
    assert_eq!(
        restored
            .combatant(&"corsair".into())
            .unwrap()
            .total_active_severity(SystemLocation::MDrive),
        3
    );

    // The restored drill still resets to its starting point
    restored.reset().unwrap();
    assert_eq!(
        restored
            .combatant(&"corsair".into())
            .unwrap()
            .total_active_severity(SystemLocation::MDrive),
        0
    );
}

#[test]
fn config_from_toml_disables_sustained_damage() {
    let config = SessionConfig::from_toml_str(
        r#"
        [missiles]
        retain_rounds = 3

        [damage]
        sustained_damage = false
        "#,
    )
    .unwrap();
    let mut battle = BattleState::with_config(config);
    battle
        .add_contact(
            Combatant::new("gun", "Gunboat", 50, 0)
                .with_weapon(Weapon::new("Heavy Gun", "1d6+30".parse().unwrap())),
        )
        .unwrap();
    battle.add_contact(Combatant::new("hulk", "Hulk", 100, 0)).unwrap();
    battle.start_combat().unwrap();

    // 31+ damage on 100 hull crosses three 10% marks
    let options = AttackOptions::at_range(RangeBand::Short).with_extra_dm(6);
    let outcome = battle
        .fire_weapon(&"gun".into(), "Heavy Gun", &"hulk".into(), &options, &mut ChaCha8Rng::seed_from_u64(2))
        .unwrap();
    assert!(outcome.attack.hit);
    assert!(outcome
        .criticals
        .iter()
        .all(|c| !(c.location == SystemLocation::Hull && c.severity == 1)));
}

#[test]
fn session_teardown() {
    let mut battle = drill();
    battle.clear();
    assert_eq!(battle.state(), SessionState::Idle);
    assert!(battle.contacts().is_empty());
    assert_eq!(battle.reset().unwrap_err(), CombatError::InvalidTransition {
        from: SessionState::Idle,
        to: SessionState::Resetting,
    });
    battle.start_combat().unwrap();
    assert_eq!(battle.state(), SessionState::Combat);
}
