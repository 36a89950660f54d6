//! Per-subsystem critical effect tables
//!
//! Every table except the weapon table is keyed on the *total active
//! severity* at the location, so two severity-2 hits on the M-Drive read the
//! severity-4 row. Weapon criticals hit an individual mount and use the
//! severity of that single hit.

use crate::combatant::{Combatant, WeaponCondition};
use crate::dice::roll_d6_total;
use crate::types::{RangeBand, SystemLocation};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a fuel critical drains the tanks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FuelLoss {
    /// Tons lost per hour
    LeakPerHour { tons: u32 },
    /// Tons lost per combat round
    LeakPerRound { tons: u32 },
    /// One-off loss of a percentage of current fuel
    PercentLost { percent: u32 },
    TankDestroyed,
}

/// A crew member injured by a crew critical
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewCasualty {
    /// Index into the combatant's crew roster
    pub crew_index: usize,
    pub name: String,
    pub damage: u32,
}

/// Structured result of a critical hit on one subsystem
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalEffect {
    pub location: Option<SystemLocation>,
    /// Severity the table was read at (total active, or the single hit for weapons)
    pub severity: u32,
    /// Subsystem no longer functions
    pub disabled: bool,
    pub message: String,

    // === Drives ===
    pub thrust_penalty: u32,
    pub control_dm: i32,

    // === Power ===
    /// Remaining power output as a percentage; `None` when unaffected
    pub power_percent: Option<u32>,

    // === Sensors / Computer ===
    /// DM to attack rolls made by this ship
    pub attack_dm: i32,
    /// Furthest band sensors can still resolve; `None` once blind
    pub max_range: Option<RangeBand>,

    // === Structure ===
    pub armor_reduction: u32,
    /// Hull damage to apply immediately
    pub hull_damage: u32,

    // === Weapon ===
    pub weapon_condition: Option<WeaponCondition>,
    pub weapon_explodes: bool,

    // === Consumables ===
    pub fuel_loss: Option<FuelLoss>,
    pub crew_casualty: Option<CrewCasualty>,
    pub cargo_lost_percent: u32,
}

impl CriticalEffect {
    fn at(location: SystemLocation, severity: u32) -> Self {
        CriticalEffect {
            location: Some(location),
            severity,
            ..Default::default()
        }
    }

    /// True when the effect changes nothing (severity 0)
    pub fn is_none(&self) -> bool {
        self.severity == 0
    }
}

/// M-Drive: thrust loss and control DM scale with severity, dead at 5+
pub fn m_drive_effects(total_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::MDrive, total_severity);
    if total_severity == 0 {
        effect.message = "M-Drive nominal".to_string();
        return effect;
    }
    effect.thrust_penalty = total_severity;
    effect.control_dm = -(total_severity as i32);
    effect.disabled = total_severity >= 5;
    effect.message = if effect.disabled {
        "M-Drive disabled - ship is drifting".to_string()
    } else {
        format!(
            "M-Drive damaged: Thrust -{}, control DM {}",
            effect.thrust_penalty, effect.control_dm
        )
    };
    effect
}

/// Power plant: output drops in steps, offline at 4+
pub fn power_plant_effects(total_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::PowerPlant, total_severity);
    if total_severity == 0 {
        effect.message = "Power plant nominal".to_string();
        return effect;
    }
    let power = match total_severity {
        1 => 100,
        2 => 90,
        3 => 50,
        _ => 0,
    };
    effect.power_percent = Some(power);
    effect.thrust_penalty = 1;
    effect.disabled = total_severity >= 4;
    effect.message = if effect.disabled {
        "Power plant offline".to_string()
    } else {
        format!("Power plant damaged: output {}%, Thrust -1", power)
    };
    effect
}

/// Sensors: DM-2 from the first hit, usable range shrinks, blind at 6+
pub fn sensor_effects(total_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Sensors, total_severity);
    if total_severity == 0 {
        effect.max_range = Some(RangeBand::Distant);
        effect.message = "Sensors nominal".to_string();
        return effect;
    }
    effect.attack_dm = -2;
    effect.max_range = match total_severity {
        1 => Some(RangeBand::Distant),
        2 => Some(RangeBand::Medium),
        3 => Some(RangeBand::Short),
        4 => Some(RangeBand::Close),
        5 => Some(RangeBand::Adjacent),
        _ => None,
    };
    effect.disabled = effect.max_range.is_none();
    effect.message = match effect.max_range {
        Some(band) => format!("Sensors damaged: DM-2, inoperative beyond {} range", band),
        None => "Sensors destroyed - ship is blind".to_string(),
    };
    effect
}

/// Weapon mount, keyed on the single hit's severity
pub fn weapon_effects(hit_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Weapon, hit_severity);
    let condition = match hit_severity {
        0 => {
            effect.message = "Weapon undamaged".to_string();
            return effect;
        }
        1 => WeaponCondition::Bane,
        2 => WeaponCondition::Disabled,
        _ => WeaponCondition::Destroyed,
    };
    effect.weapon_condition = Some(condition);
    effect.disabled = condition >= WeaponCondition::Disabled;
    effect.weapon_explodes = hit_severity >= 4;
    effect.message = match hit_severity {
        1 => "Weapon damaged: attacks suffer a bane".to_string(),
        2 => "Weapon disabled".to_string(),
        3 => "Weapon destroyed".to_string(),
        _ => "Weapon destroyed - magazine explodes into the hull".to_string(),
    };
    effect
}

/// Jump drive: any damage takes it offline
pub fn j_drive_effects(total_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::JDrive, total_severity);
    effect.disabled = total_severity > 0;
    effect.message = if effect.disabled {
        format!("Jump drive disabled (severity {})", total_severity)
    } else {
        "Jump drive nominal".to_string()
    };
    effect
}

/// Computer: severity 1 is DM-2, then -(severity + 1); crashed at 4+
pub fn computer_effects(total_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Computer, total_severity);
    effect.attack_dm = match total_severity {
        0 => 0,
        1 => -2,
        s => -(s as i32 + 1),
    };
    effect.disabled = total_severity >= 4;
    effect.message = match total_severity {
        0 => "Computer nominal".to_string(),
        _ if effect.disabled => format!("Computer crashed: DM {}", effect.attack_dm),
        _ => format!("Computer damaged: DM {}", effect.attack_dm),
    };
    effect
}

/// Armour: flat permanent reduction equal to severity
pub fn armour_effects(severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Armour, severity);
    effect.armor_reduction = severity;
    effect.message = format!("Armour reduced by {}", severity);
    effect
}

/// Hull: severity D6 damage, applied on the spot
pub fn hull_effects(rng: &mut impl Rng, severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Hull, severity);
    effect.hull_damage = roll_d6_total(rng, severity) as u32;
    effect.message = format!("Hull breach: {} additional damage", effect.hull_damage);
    effect
}

/// Fuel: leak rate worsens with severity until the tank is lost
pub fn fuel_effects(rng: &mut impl Rng, total_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Fuel, total_severity);
    let loss = match total_severity {
        0 => {
            effect.message = "Fuel tanks intact".to_string();
            return effect;
        }
        1 => FuelLoss::LeakPerHour { tons: 1 },
        2 => FuelLoss::LeakPerRound { tons: 1 },
        3 => FuelLoss::PercentLost {
            percent: roll_d6_total(rng, 1) as u32 * 10,
        },
        _ => FuelLoss::TankDestroyed,
    };
    effect.disabled = loss == FuelLoss::TankDestroyed;
    effect.message = match loss {
        FuelLoss::LeakPerHour { tons } => format!("Fuel leak: {} ton per hour", tons),
        FuelLoss::LeakPerRound { tons } => format!("Fuel leak: {} ton per round", tons),
        FuelLoss::PercentLost { percent } => format!("Fuel tank ruptured: {}% lost", percent),
        FuelLoss::TankDestroyed => "Fuel tank destroyed".to_string(),
    };
    effect.fuel_loss = Some(loss);
    effect
}

/// Crew: one random living crew member takes 1D, regardless of severity
pub fn crew_effects(rng: &mut impl Rng, combatant: &Combatant, severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Crew, severity);
    let living: Vec<usize> = combatant
        .crew
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        .map(|(i, _)| i)
        .collect();

    if living.is_empty() {
        effect.message = "Crew compartment hit - no casualties".to_string();
        return effect;
    }

    let crew_index = living[rng.gen_range(0..living.len())];
    let damage = roll_d6_total(rng, 1) as u32;
    let name = combatant.crew[crew_index].name.clone();
    effect.message = format!("{} injured for {} damage", name, damage);
    effect.crew_casualty = Some(CrewCasualty {
        crew_index,
        name,
        damage,
    });
    effect
}

/// Cargo: 10% of the hold lost per point of severity
pub fn cargo_effects(total_severity: u32) -> CriticalEffect {
    let mut effect = CriticalEffect::at(SystemLocation::Cargo, total_severity);
    effect.cargo_lost_percent = (total_severity * 10).min(100);
    effect.disabled = effect.cargo_lost_percent >= 100;
    effect.message = format!("Cargo hold hit: {}% of cargo lost", effect.cargo_lost_percent);
    effect
}

/// Effect of a hit that has just been recorded on `combatant`.
///
/// `hit_severity` is the severity of this hit; tables that sum severities
/// read the combatant's current total at the location.
pub fn effect_for(
    rng: &mut impl Rng,
    combatant: &Combatant,
    location: SystemLocation,
    hit_severity: u32,
) -> CriticalEffect {
    let total = combatant.total_active_severity(location);
    match location {
        SystemLocation::Sensors => sensor_effects(total),
        SystemLocation::PowerPlant => power_plant_effects(total),
        SystemLocation::Fuel => fuel_effects(rng, total),
        SystemLocation::Weapon => weapon_effects(hit_severity),
        SystemLocation::Armour => armour_effects(hit_severity),
        SystemLocation::Hull => hull_effects(rng, hit_severity),
        SystemLocation::MDrive => m_drive_effects(total),
        SystemLocation::Cargo => cargo_effects(total),
        SystemLocation::JDrive => j_drive_effects(total),
        SystemLocation::Crew => crew_effects(rng, combatant, hit_severity),
        SystemLocation::Computer => computer_effects(total),
    }
}

/// Combined attack DM a combatant suffers from sensor and computer damage
pub fn attack_penalty(combatant: &Combatant) -> i32 {
    sensor_effects(combatant.total_active_severity(SystemLocation::Sensors)).attack_dm
        + computer_effects(combatant.total_active_severity(SystemLocation::Computer)).attack_dm
}
