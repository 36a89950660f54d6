//! Attack resolution - opposed 2D to-hit, damage and critical triggers

use super::result::{AttackModifiers, AttackResult, CriticalTrigger};
use crate::combatant::{Combatant, CrewRole, Weapon, WeaponCondition};
use crate::critical::{
    attack_penalty, calculate_severity, power_plant_effects, roll_critical_location,
    CRITICAL_EFFECT_THRESHOLD,
};
use crate::dice::{roll_2d6_bane_with_rng, roll_2d6_with_rng, roll_expr_with_rng, SeededRng};
use crate::error::Result;
use crate::types::{RangeBand, SystemLocation};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Every ship attack is a 2D check against 8
pub const TARGET_NUMBER: i32 = 8;

/// Bonus for firing on a target the sensors have locked
pub const SENSOR_LOCK_DM: i32 = 2;

/// Per-shot options chosen by the attacker and the situation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOptions {
    pub range: RangeBand,
    /// Overrides the attacker's best gunner skill
    #[serde(default)]
    pub gunner_skill: Option<i32>,
    /// Target's dodge level, subtracted from the attack
    #[serde(default)]
    pub dodge: u32,
    /// Subsystem being aimed at
    #[serde(default)]
    pub called_shot: Option<SystemLocation>,
    #[serde(default)]
    pub sensor_lock: bool,
    #[serde(default)]
    pub extra_dm: i32,
    /// Combat round the shot is fired in; stamped on launched missiles
    #[serde(default)]
    pub round: u32,
}

impl AttackOptions {
    pub fn at_range(range: RangeBand) -> Self {
        AttackOptions {
            range,
            gunner_skill: None,
            dodge: 0,
            called_shot: None,
            sensor_lock: false,
            extra_dm: 0,
            round: 0,
        }
    }

    pub fn with_skill(mut self, skill: i32) -> Self {
        self.gunner_skill = Some(skill);
        self
    }

    pub fn with_dodge(mut self, dodge: u32) -> Self {
        self.dodge = dodge;
        self
    }

    pub fn with_called_shot(mut self, location: SystemLocation) -> Self {
        self.called_shot = Some(location);
        self
    }

    pub fn with_sensor_lock(mut self) -> Self {
        self.sensor_lock = true;
        self
    }

    pub fn with_extra_dm(mut self, dm: i32) -> Self {
        self.extra_dm = dm;
        self
    }

    pub fn in_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }
}

/// Attack DM from reduced power, using the worse of plant damage and drained reserves
pub fn power_degradation_dm(attacker: &Combatant) -> i32 {
    let plant_percent = power_plant_effects(attacker.total_active_severity(SystemLocation::PowerPlant))
        .power_percent
        .unwrap_or(100);
    let pool_percent = attacker.power.map_or(100, |p| p.percent());
    match plant_percent.min(pool_percent) {
        75.. => 0,
        50..=74 => -1,
        1..=49 => -2,
        _ => -4,
    }
}

/// Gather every DM for a shot
fn attack_modifiers(attacker: &Combatant, weapon: &Weapon, options: &AttackOptions) -> AttackModifiers {
    AttackModifiers {
        skill: options
            .gunner_skill
            .unwrap_or_else(|| attacker.skill_for(CrewRole::Gunner)),
        range_dm: options.range.attack_dm(),
        dodge_dm: options.dodge as i32,
        called_shot_dm: options.called_shot.map_or(0, |loc| loc.called_shot_penalty()),
        fire_control_dm: attacker.fire_control,
        sensor_lock_dm: if options.sensor_lock { SENSOR_LOCK_DM } else { 0 },
        power_dm: power_degradation_dm(attacker),
        damage_dm: attack_penalty(attacker),
        weapon_dm: weapon.range_bonus_dm(options.range),
        extra_dm: options.extra_dm,
    }
}

/// Resolve an attack with a seeded stream so the result can be re-derived
pub fn resolve_attack_seeded(
    attacker: &Combatant,
    weapon: &Weapon,
    target: &Combatant,
    options: &AttackOptions,
    seed: u64,
) -> Result<AttackResult> {
    let mut rng = SeededRng::new(seed);
    resolve_attack(attacker, weapon, target, options, &mut rng)
}

/// Resolve one attack.
///
/// Pure: neither combatant is modified. Steps:
/// 1. Refuse weapons that cannot fire at this range (out of range, damaged, empty)
/// 2. Roll 2D (with a bane for damaged mounts) plus DMs against 8
/// 3. On a hit, roll damage and subtract armour; ion weapons drain power instead
/// 4. Flag a critical when effect is 6+ and damage got through
///
/// Missile weapons stop after step 2: a hit means the salvo launched with a
/// lock, and impact damage is rolled by the missile tracker on arrival.
pub fn resolve_attack(
    attacker: &Combatant,
    weapon: &Weapon,
    target: &Combatant,
    options: &AttackOptions,
    rng: &mut impl Rng,
) -> Result<AttackResult> {
    weapon.check_can_fire(options.range)?;

    let modifiers = attack_modifiers(attacker, weapon, options);
    let roll = if weapon.condition == WeaponCondition::Bane {
        roll_2d6_bane_with_rng(rng)
    } else {
        roll_2d6_with_rng(rng)
    };
    let total = roll.total() + modifiers.total();
    let effect = total - TARGET_NUMBER;
    let hit = effect >= 0;

    let mut result = AttackResult {
        attacker_id: attacker.id.clone(),
        target_id: target.id.clone(),
        weapon: weapon.name.clone(),
        range: options.range,
        roll,
        modifiers,
        total,
        target_number: TARGET_NUMBER,
        effect,
        hit,
        damage_roll: None,
        raw_damage: 0,
        armor_absorbed: 0,
        actual_damage: 0,
        power_drain: 0,
        critical: None,
    };

    if hit && !weapon.is_missile() {
        let damage_roll = roll_expr_with_rng(rng, weapon.damage);
        let raw = damage_roll.total().max(0) as u32;
        result.raw_damage = raw;

        if weapon.is_ion() {
            result.power_drain = raw.saturating_add(effect as u32).saturating_mul(10);
        } else {
            result.armor_absorbed = raw.min(target.armor);
            result.actual_damage = raw - result.armor_absorbed;
        }
        result.damage_roll = Some(damage_roll);

        if effect >= CRITICAL_EFFECT_THRESHOLD && result.actual_damage > 0 {
            let location = match options.called_shot {
                Some(location) => location,
                None => roll_critical_location(rng),
            };
            result.critical = Some(CriticalTrigger {
                location,
                severity: calculate_severity(result.actual_damage),
            });
        }
    }

    tracing::debug!(
        attacker = %result.attacker_id,
        target = %result.target_id,
        weapon = %result.weapon,
        total = result.total,
        effect = result.effect,
        hit = result.hit,
        damage = result.actual_damage,
        "attack resolved"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::ResourcePool;
    use crate::critical::CriticalRecord;
    use crate::dice::DiceExpr;
    use crate::error::CombatError;

    fn attacker() -> Combatant {
        Combatant::new("raider", "Raider", 80, 2)
    }

    fn target(armor: u32) -> Combatant {
        Combatant::new("trader", "Free Trader", 80, armor)
    }

    fn heavy_gun() -> Weapon {
        Weapon::new("Spinal Test Gun", DiceExpr::new(10, 6))
    }

    #[test]
    fn test_guaranteed_miss_still_reports_effect() {
        let opts = AttackOptions::at_range(RangeBand::Short).with_extra_dm(-30);
        let result = resolve_attack(&attacker(), &heavy_gun(), &target(0), &opts, &mut SeededRng::new(1)).unwrap();
        assert!(!result.hit);
        assert_eq!(result.effect, result.total - TARGET_NUMBER);
        assert!(result.effect < 0);
        assert!(result.damage_roll.is_none());
        assert_eq!(result.actual_damage, 0);
    }

    #[test]
    fn test_attack_total_formula() {
        let opts = AttackOptions::at_range(RangeBand::Long)
            .with_skill(2)
            .with_dodge(1)
            .with_sensor_lock()
            .with_called_shot(SystemLocation::Sensors);
        let shooter = attacker().with_fire_control(1);
        let result = resolve_attack(&shooter, &heavy_gun(), &target(0), &opts, &mut SeededRng::new(5)).unwrap();

        // 2 skill - 2 long - 1 dodge - 2 called shot + 1 fire control + 2 lock
        assert_eq!(result.modifiers.total(), 0);
        assert_eq!(result.total, result.roll.total());
    }

    #[test]
    fn test_out_of_range_is_an_error_not_a_miss() {
        let opts = AttackOptions::at_range(RangeBand::Distant);
        let err = resolve_attack(&attacker(), &Weapon::beam_laser(), &target(0), &opts, &mut SeededRng::new(1))
            .unwrap_err();
        assert!(matches!(err, CombatError::OutOfRange { range: RangeBand::Distant, .. }));
    }

    #[test]
    fn test_armor_absorbs_damage() {
        let opts = AttackOptions::at_range(RangeBand::Short).with_extra_dm(10);
        let weapon = Weapon::new("Light Gun", DiceExpr::new(1, 6));
        let result = resolve_attack(&attacker(), &weapon, &target(10), &opts, &mut SeededRng::new(2)).unwrap();
        assert!(result.hit);
        assert_eq!(result.actual_damage, 0);
        assert_eq!(result.armor_absorbed, result.raw_damage);
        assert!(result.critical.is_none());
    }

    #[test]
    fn test_big_effect_triggers_critical() {
        let opts = AttackOptions::at_range(RangeBand::Short).with_extra_dm(30);
        let result = resolve_attack(&attacker(), &heavy_gun(), &target(4), &opts, &mut SeededRng::new(3)).unwrap();
        assert!(result.effect >= CRITICAL_EFFECT_THRESHOLD);
        assert_eq!(result.actual_damage, result.raw_damage - 4);
        let crit = result.critical.unwrap();
        assert_eq!(crit.severity, calculate_severity(result.actual_damage));
    }

    #[test]
    fn test_called_shot_sets_critical_location() {
        let opts = AttackOptions::at_range(RangeBand::Short)
            .with_extra_dm(30)
            .with_called_shot(SystemLocation::JDrive);
        let result = resolve_attack(&attacker(), &heavy_gun(), &target(0), &opts, &mut SeededRng::new(3)).unwrap();
        assert_eq!(result.modifiers.called_shot_dm, -4);
        assert_eq!(result.critical.unwrap().location, SystemLocation::JDrive);
    }

    #[test]
    fn test_small_effect_no_critical() {
        // Max roll 12 + 1 short range - 0 = 13, effect 5 at most
        let opts = AttackOptions::at_range(RangeBand::Short).with_skill(0);
        for seed in 0..50 {
            let result = resolve_attack(&attacker(), &heavy_gun(), &target(0), &opts, &mut SeededRng::new(seed)).unwrap();
            assert!(result.critical.is_none());
        }
    }

    #[test]
    fn test_ion_drains_power_not_hull() {
        let opts = AttackOptions::at_range(RangeBand::Short).with_extra_dm(30);
        let result = resolve_attack(&attacker(), &Weapon::ion_cannon(), &target(0), &opts, &mut SeededRng::new(4)).unwrap();
        assert!(result.hit);
        assert_eq!(result.actual_damage, 0);
        assert!(result.critical.is_none());
        let roll = result.damage_roll.as_ref().unwrap().total();
        assert_eq!(result.power_drain as i32, (roll + result.effect) * 10);
    }

    #[test]
    fn test_missile_launch_skips_damage() {
        let opts = AttackOptions::at_range(RangeBand::Long).with_extra_dm(30);
        let result = resolve_attack(&attacker(), &Weapon::missile_rack(6), &target(0), &opts, &mut SeededRng::new(4)).unwrap();
        assert!(result.hit);
        assert_eq!(result.modifiers.weapon_dm, 2);
        assert!(result.damage_roll.is_none());
    }

    #[test]
    fn test_seeded_attack_reproducible() {
        let opts = AttackOptions::at_range(RangeBand::Medium).with_skill(1);
        let a = resolve_attack_seeded(&attacker(), &heavy_gun(), &target(2), &opts, 999).unwrap();
        let b = resolve_attack_seeded(&attacker(), &heavy_gun(), &target(2), &opts, 999).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_power_degradation() {
        let mut ship = attacker();
        assert_eq!(power_degradation_dm(&ship), 0);

        ship.power = Some(ResourcePool { current: 30, max: 60 });
        assert_eq!(power_degradation_dm(&ship), -1);

        ship.criticals.push(CriticalRecord::new(SystemLocation::PowerPlant, 4));
        assert_eq!(power_degradation_dm(&ship), -4);
    }

    #[test]
    fn test_large_power_pool() {
        let ship = attacker().with_power(50_000_000);
        assert_eq!(power_degradation_dm(&ship), 0);
        let opts = AttackOptions::at_range(RangeBand::Short);
        let result = resolve_attack(&ship, &heavy_gun(), &target(0), &opts, &mut SeededRng::new(6)).unwrap();
        assert_eq!(result.modifiers.power_dm, 0);
    }

    #[test]
    fn test_damaged_sensors_hurt_aim() {
        let mut ship = attacker();
        ship.criticals.push(CriticalRecord::new(SystemLocation::Sensors, 2));
        let opts = AttackOptions::at_range(RangeBand::Short).with_skill(0);
        let result = resolve_attack(&ship, &heavy_gun(), &target(0), &opts, &mut SeededRng::new(1)).unwrap();
        assert_eq!(result.modifiers.damage_dm, -2);
    }
}
