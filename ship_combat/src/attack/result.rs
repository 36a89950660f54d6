//! AttackResult - Outcome of an attack roll

use crate::dice::DiceRoll;
use crate::types::{CombatantId, RangeBand, SystemLocation};
use serde::{Deserialize, Serialize};

/// Every DM that went into the attack total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackModifiers {
    pub skill: i32,
    pub range_dm: i32,
    pub dodge_dm: i32,
    pub called_shot_dm: i32,
    pub fire_control_dm: i32,
    pub sensor_lock_dm: i32,
    pub power_dm: i32,
    /// From the attacker's own sensor and computer criticals
    pub damage_dm: i32,
    /// Weapon range bonus (missiles at long range)
    pub weapon_dm: i32,
    pub extra_dm: i32,
}

impl AttackModifiers {
    /// Aggregate of the situational DMs: called shot, fire control,
    /// sensor lock, power, damage and extra
    pub fn situational(&self) -> i32 {
        self.called_shot_dm
            + self.fire_control_dm
            + self.sensor_lock_dm
            + self.power_dm
            + self.damage_dm
            + self.extra_dm
    }

    pub fn total(&self) -> i32 {
        self.skill + self.range_dm - self.dodge_dm + self.weapon_dm + self.situational()
    }
}

/// A critical earned by an attack, not yet applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalTrigger {
    pub location: SystemLocation,
    pub severity: u32,
}

/// Result of resolving one attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    // === Participants ===
    pub attacker_id: CombatantId,
    pub target_id: CombatantId,
    pub weapon: String,
    pub range: RangeBand,

    // === To-hit ===
    pub roll: DiceRoll,
    pub modifiers: AttackModifiers,
    pub total: i32,
    pub target_number: i32,
    /// `total - target_number`; computed whether or not the attack hits
    pub effect: i32,
    pub hit: bool,

    // === Damage ===
    pub damage_roll: Option<DiceRoll>,
    pub raw_damage: u32,
    pub armor_absorbed: u32,
    /// Hull damage after armour (always 0 for ion weapons)
    pub actual_damage: u32,
    /// Power drained by ion weapons
    pub power_drain: u32,

    // === Critical ===
    pub critical: Option<CriticalTrigger>,
}

impl AttackResult {
    /// Whether the hit earned a critical
    pub fn is_critical(&self) -> bool {
        self.critical.is_some()
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if !self.hit {
            return format!(
                "{} misses with {} ({} vs {})",
                self.attacker_id, self.weapon, self.total, self.target_number
            );
        }

        let mut parts = vec![format!(
            "{} hits {} with {} (effect {})",
            self.attacker_id, self.target_id, self.weapon, self.effect
        )];

        if self.power_drain > 0 {
            parts.push(format!("{} power drained", self.power_drain));
        } else if self.damage_roll.is_some() {
            parts.push(format!("{} damage", self.actual_damage));
            if self.armor_absorbed > 0 {
                parts.push(format!("{} absorbed by armour", self.armor_absorbed));
            }
        }

        if let Some(crit) = &self.critical {
            parts.push(format!("CRITICAL {} severity {}", crit.location, crit.severity));
        }

        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_totals() {
        let mods = AttackModifiers {
            skill: 2,
            range_dm: -2,
            dodge_dm: 1,
            called_shot_dm: -4,
            fire_control_dm: 2,
            sensor_lock_dm: 2,
            power_dm: -1,
            damage_dm: 0,
            weapon_dm: 2,
            extra_dm: 0,
        };
        assert_eq!(mods.situational(), -1);
        assert_eq!(mods.total(), 2 - 2 - 1 + 2 - 1);
    }
}
