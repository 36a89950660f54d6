//! Critical hit system - severity, location, cascading subsystem effects

mod effects;
mod record;
mod repair;

pub use effects::{
    armour_effects, attack_penalty, cargo_effects, computer_effects, crew_effects, effect_for,
    fuel_effects, hull_effects, j_drive_effects, m_drive_effects, power_plant_effects,
    sensor_effects, weapon_effects, CrewCasualty, CriticalEffect, FuelLoss,
};
pub use record::CriticalRecord;
pub use repair::{attempt_repair, expire_temporary_repair, RepairOutcome, REPAIR_TARGET};

use crate::combatant::Combatant;
use crate::dice::roll_2d6_with_rng;
use crate::types::SystemLocation;
use rand::Rng;

/// Highest severity a single critical can have
pub const MAX_SEVERITY: u32 = 6;

/// Attack effect needed (with damage getting through) to score a critical
pub const CRITICAL_EFFECT_THRESHOLD: i32 = 6;

/// Severity of a critical from the damage that caused it: one per 10 points, max 6
pub fn calculate_severity(damage: u32) -> u32 {
    damage.div_ceil(10).min(MAX_SEVERITY)
}

/// Critical location table, indexed by 2D total
pub fn location_for_roll(total: i32) -> Option<SystemLocation> {
    let location = match total {
        2 => SystemLocation::Sensors,
        3 => SystemLocation::PowerPlant,
        4 => SystemLocation::Fuel,
        5 => SystemLocation::Weapon,
        6 => SystemLocation::Armour,
        7 => SystemLocation::Hull,
        8 => SystemLocation::MDrive,
        9 => SystemLocation::Cargo,
        10 => SystemLocation::JDrive,
        11 => SystemLocation::Crew,
        12 => SystemLocation::Computer,
        _ => return None,
    };
    Some(location)
}

/// Roll 2D on the critical location table
pub fn roll_critical_location(rng: &mut impl Rng) -> SystemLocation {
    let total = roll_2d6_with_rng(rng).total();
    // 2D always lands on the table
    location_for_roll(total).unwrap_or(SystemLocation::Hull)
}

/// Record a critical against `combatant`. Returns the new total active severity there.
pub fn apply_critical_hit(combatant: &mut Combatant, location: SystemLocation, severity: u32) -> u32 {
    combatant.criticals.push(CriticalRecord::new(location, severity));
    combatant.total_active_severity(location)
}

/// Whether a hull change from `previous_hull` to `current_hull` crossed a
/// fresh 10%-of-max boundary, which earns a severity 1 hull critical.
pub fn triggers_sustained_damage(current_hull: u32, max_hull: u32, previous_hull: u32) -> bool {
    if max_hull == 0 || current_hull >= previous_hull {
        return false;
    }
    let lost_before = u64::from(max_hull.saturating_sub(previous_hull));
    let lost_after = u64::from(max_hull.saturating_sub(current_hull));
    let chunk = |lost: u64| lost * 10 / u64::from(max_hull);
    chunk(lost_after) > chunk(lost_before)
}
