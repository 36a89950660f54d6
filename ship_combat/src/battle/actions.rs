//! Compound actions on the battle state: weapon fire, criticals, damage
//! control and boarding. Each is at most one version bump, and none when
//! nothing changed.

use super::{BattleState, DamageEvent, DamageSource};
use crate::attack::{resolve_attack, AttackOptions, AttackResult};
use crate::boarding::{can_board, resolve_boarding, BoardingParams, BoardingResult};
use crate::combatant::{Combatant, CrewRole};
use crate::critical::{
    self, apply_critical_hit, effect_for, m_drive_effects, power_plant_effects,
    triggers_sustained_damage, CriticalEffect, FuelLoss, RepairOutcome, MAX_SEVERITY,
};
use crate::error::{CombatError, Result};
use crate::types::{CombatantId, MissileId, SystemLocation};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A critical as recorded against a combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalOutcome {
    pub target_id: CombatantId,
    pub location: SystemLocation,
    pub severity: u32,
    /// Total active severity at the location after this hit
    pub total_severity: u32,
    pub effect: CriticalEffect,
    /// Mount hit by a weapon critical
    pub weapon: Option<String>,
}

/// Everything a single weapon discharge did to the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireOutcome {
    pub attack: AttackResult,
    /// Hull changes in the order they happened
    pub events: Vec<DamageEvent>,
    pub criticals: Vec<CriticalOutcome>,
    pub power_drained: u32,
    /// Salvo put in flight by a missile weapon hit
    pub missile: Option<MissileId>,
    pub version: u64,
}

impl FireOutcome {
    /// Hull lost across all events
    pub fn hull_damage(&self) -> u32 {
        self.events.iter().map(|e| e.applied).sum()
    }

    pub fn target_destroyed(&self) -> bool {
        self.events.iter().any(|e| e.destroyed)
    }
}

impl BattleState {
    /// Fire a weapon: resolve the attack, spend ammo, apply damage or ion
    /// drain, record criticals and any sustained-damage hull critical.
    ///
    /// A missile weapon hit launches a salvo from the options' range in the
    /// options' round instead of dealing damage.
    pub fn fire_weapon(
        &mut self,
        attacker_id: &CombatantId,
        weapon_name: &str,
        target_id: &CombatantId,
        options: &AttackOptions,
        rng: &mut impl Rng,
    ) -> Result<FireOutcome> {
        self.require_active()?;
        let attacker = self.require(attacker_id)?;
        let target = self.require(target_id)?;
        let weapon = attacker
            .weapon(weapon_name)
            .ok_or_else(|| CombatError::WeaponNotFound(weapon_name.to_string()))?;
        let attack = resolve_attack(attacker, weapon, target, options, rng)?;
        let spends_ammo = weapon.ammo_capacity.is_some();
        let is_missile = weapon.is_missile();

        self.require_mut(attacker_id)?
            .weapon_mut(weapon_name)
            .ok_or_else(|| CombatError::WeaponNotFound(weapon_name.to_string()))?
            .consume_ammo()?;

        let mut criticals = Vec::new();
        let mut power_drained = 0;
        let mut missile = None;

        if attack.hit && is_missile {
            missile = Some(self.missiles.launch(
                attacker_id.clone(),
                target_id.clone(),
                options.range,
                options.round,
            ));
        } else if attack.hit {
            if attack.power_drain > 0 {
                if let Some(pool) = self.require_mut(target_id)?.power.as_mut() {
                    power_drained = pool.drain(attack.power_drain);
                }
            }

            if attack.actual_damage > 0 {
                let source = DamageSource::Weapon {
                    attacker: attacker_id.clone(),
                    weapon: weapon_name.to_string(),
                };
                let event = self.damage_hull(target_id, attack.actual_damage, source)?;

                if let Some(trigger) = attack.critical {
                    criticals.extend(self.record_critical(
                        target_id,
                        trigger.location,
                        trigger.severity,
                        rng,
                    )?);
                }

                criticals.extend(self.check_sustained_damage(&event, rng)?);
            }
        }

        let changed = spends_ammo
            || missile.is_some()
            || power_drained > 0
            || !criticals.is_empty()
            || !self.pending.is_empty();
        let events = if changed { self.commit() } else { Vec::new() };
        Ok(FireOutcome {
            attack,
            events,
            criticals,
            power_drained,
            missile,
            version: self.version,
        })
    }

    /// Severity 1 hull critical when attack damage crosses a 10% hull mark.
    /// Critical follow-on damage never comes through here. Does not commit.
    pub(super) fn check_sustained_damage(
        &mut self,
        event: &DamageEvent,
        rng: &mut impl Rng,
    ) -> Result<Vec<CriticalOutcome>> {
        if !self.config.damage.sustained_damage {
            return Ok(Vec::new());
        }
        let max_hull = self.require(&event.target_id)?.max_hull;
        if triggers_sustained_damage(event.new_hull, max_hull, event.previous_hull) {
            self.record_critical(&event.target_id, SystemLocation::Hull, 1, rng)
        } else {
            Ok(Vec::new())
        }
    }

    /// Record a critical directly (GM rulings, scripted hazards)
    pub fn apply_critical(
        &mut self,
        target_id: &CombatantId,
        location: SystemLocation,
        severity: u32,
        rng: &mut impl Rng,
    ) -> Result<Vec<CriticalOutcome>> {
        self.require_active()?;
        if severity == 0 || severity > MAX_SEVERITY {
            return Err(CombatError::InvalidAmount(i64::from(severity)));
        }
        self.require(target_id)?;
        let outcomes = self.record_critical(target_id, location, severity, rng)?;
        self.commit();
        Ok(outcomes)
    }

    /// Append a critical record and apply its effect to the target. Does not commit.
    pub(super) fn record_critical(
        &mut self,
        target_id: &CombatantId,
        location: SystemLocation,
        severity: u32,
        rng: &mut impl Rng,
    ) -> Result<Vec<CriticalOutcome>> {
        let explosion_crit = self.config.damage.weapon_explosion_hull_crit;
        let target = self.require_mut(target_id)?;
        let total_severity = apply_critical_hit(target, location, severity);
        let severity = severity.clamp(1, MAX_SEVERITY);
        let mut effect = effect_for(rng, target, location, severity);
        let mut weapon = None;
        let mut explodes = false;

        match location {
            SystemLocation::Weapon => {
                let working: Vec<usize> = target
                    .weapons
                    .iter()
                    .enumerate()
                    .filter(|(_, w)| w.is_operational())
                    .map(|(i, _)| i)
                    .collect();
                if working.is_empty() {
                    effect.message.push_str(" (no working mount left to damage)");
                } else {
                    let mount = &mut target.weapons[working[rng.gen_range(0..working.len())]];
                    if let Some(condition) = effect.weapon_condition {
                        mount.condition = mount.condition.max(condition);
                    }
                    weapon = Some(mount.name.clone());
                    explodes = effect.weapon_explodes && explosion_crit;
                }
            }
            SystemLocation::Armour => {
                target.armor = target.armor.saturating_sub(effect.armor_reduction);
            }
            SystemLocation::PowerPlant => {
                if let (Some(percent), Some(pool)) = (effect.power_percent, target.power.as_mut()) {
                    pool.current = pool.current.min(pool.share(percent));
                }
            }
            SystemLocation::Fuel => {
                if let (Some(loss), Some(pool)) = (effect.fuel_loss, target.fuel.as_mut()) {
                    match loss {
                        FuelLoss::PercentLost { percent } => {
                            pool.drain(pool.share(percent));
                        }
                        FuelLoss::TankDestroyed => {
                            pool.current = 0;
                        }
                        // Leaks drain over time; the round scheduler applies them
                        FuelLoss::LeakPerHour { .. } | FuelLoss::LeakPerRound { .. } => {}
                    }
                }
            }
            SystemLocation::Crew => {
                if let Some(casualty) = &effect.crew_casualty {
                    if let Some(member) = target.crew.get_mut(casualty.crew_index) {
                        member.take_damage(casualty.damage);
                    }
                }
            }
            _ => {}
        }
        refresh_drifting(target);

        tracing::debug!(
            target = %target_id,
            location = %location,
            severity,
            total_severity,
            "critical recorded"
        );

        let hull_damage = effect.hull_damage;
        let mut outcomes = vec![CriticalOutcome {
            target_id: target_id.clone(),
            location,
            severity,
            total_severity,
            effect,
            weapon,
        }];

        if hull_damage > 0 {
            self.damage_hull(
                target_id,
                hull_damage,
                DamageSource::Critical {
                    location: SystemLocation::Hull,
                },
            )?;
        }
        if explodes {
            outcomes.extend(self.record_critical(target_id, SystemLocation::Hull, 1, rng)?);
        }

        Ok(outcomes)
    }

    /// Damage control on the worst unrepaired critical at `location`.
    ///
    /// `engineer_skill` defaults to the target's best living Engineer. Only a
    /// successful repair changes the session.
    pub fn attempt_repair(
        &mut self,
        target_id: &CombatantId,
        location: SystemLocation,
        engineer_skill: Option<i32>,
        rng: &mut impl Rng,
    ) -> Result<RepairOutcome> {
        if self.state == super::SessionState::Resetting {
            return Err(CombatError::InvalidState(self.state));
        }
        let target = self.require_mut(target_id)?;
        let skill = engineer_skill.unwrap_or_else(|| target.skill_for(CrewRole::Engineer));
        let outcome = critical::attempt_repair(rng, target, location, skill);
        if outcome.success {
            refresh_drifting(target);
            self.commit();
        }
        Ok(outcome)
    }

    /// Re-open the most recent temporary repair at `location`.
    /// Driven by the caller's repair-expiry scheduler.
    pub fn expire_temporary_repair(
        &mut self,
        target_id: &CombatantId,
        location: SystemLocation,
    ) -> Result<Option<u32>> {
        let target = self.require_mut(target_id)?;
        let reopened = critical::expire_temporary_repair(target, location);
        if reopened.is_some() {
            refresh_drifting(target);
            self.commit();
        }
        Ok(reopened)
    }

    /// Send a boarding party from `attacker_id` onto `target_id` and apply
    /// the resulting crew casualties to both rosters.
    pub fn board(
        &mut self,
        attacker_id: &CombatantId,
        target_id: &CombatantId,
        params: &BoardingParams,
        rng: &mut impl Rng,
    ) -> Result<BoardingResult> {
        self.require_active()?;
        self.require(attacker_id)?;
        let eligibility = can_board(self.require(target_id)?);
        if !eligibility.allowed {
            tracing::warn!(target = %target_id, reason = %eligibility.reason, "boarding refused");
            return Err(CombatError::NotBoardable(eligibility.reason));
        }

        let result = resolve_boarding(params, rng);
        let mut lost = apply_casualties(
            self.require_mut(attacker_id)?,
            result.attacker_casualties,
            Some(CrewRole::Marine),
        );
        lost += apply_casualties(self.require_mut(target_id)?, result.defender_casualties, None);
        if lost > 0 {
            self.commit();
        }

        tracing::info!(
            attacker = %attacker_id,
            target = %target_id,
            success = result.success,
            margin = result.margin,
            "boarding action"
        );
        Ok(result)
    }
}

/// A ship drifts while its manoeuvre drive or power plant is knocked out
fn refresh_drifting(combatant: &mut Combatant) {
    combatant.drifting = m_drive_effects(combatant.total_active_severity(SystemLocation::MDrive))
        .disabled
        || power_plant_effects(combatant.total_active_severity(SystemLocation::PowerPlant)).disabled;
}

/// Kill up to `count` living crew, `prefer` role first. Returns how many fell.
fn apply_casualties(combatant: &mut Combatant, count: u32, prefer: Option<CrewRole>) -> u32 {
    let mut order: Vec<usize> = (0..combatant.crew.len())
        .filter(|&i| combatant.crew[i].is_alive())
        .collect();
    if let Some(role) = prefer {
        order.sort_by_key(|&i| combatant.crew[i].role != role);
    }

    let mut lost = 0;
    for i in order.into_iter().take(count as usize) {
        let member = &mut combatant.crew[i];
        member.take_damage(member.health);
        lost += 1;
    }
    lost
}
