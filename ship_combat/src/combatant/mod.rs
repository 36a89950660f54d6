//! Combatant - A ship or sensor contact taking part in a battle

mod weapon;

pub use weapon::{RangeBonus, Weapon, WeaponCondition, WeaponKind};

use crate::critical::CriticalRecord;
use crate::types::{CombatantId, Disposition, SystemLocation};
use serde::{Deserialize, Serialize};

/// Skill DM used when a crewed ship has nobody in the required role
pub const UNSKILLED_DM: i32 = -3;

/// Crew positions that feed skill DMs into resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewRole {
    Captain,
    Pilot,
    Gunner,
    Engineer,
    Sensors,
    Marine,
    Crew,
}

/// A named crew member with one role skill and personal health
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub role: CrewRole,
    pub skill: i32,
    pub health: u32,
    pub max_health: u32,
}

impl CrewMember {
    pub fn new(name: impl Into<String>, role: CrewRole, skill: i32, max_health: u32) -> Self {
        CrewMember {
            name: name.into(),
            role,
            skill,
            health: max_health,
            max_health,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage clamped to current health. Returns the amount applied.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.health);
        self.health -= applied;
        applied
    }
}

/// A bounded resource such as power or fuel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub current: u32,
    pub max: u32,
}

impl ResourcePool {
    /// Create a full pool
    pub fn full(max: u32) -> Self {
        ResourcePool { current: max, max }
    }

    /// Remove up to `amount`. Returns the amount actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.current);
        self.current -= drained;
        drained
    }

    /// Add up to `amount` without exceeding max. Returns the amount added.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.max.saturating_sub(self.current));
        self.current += added;
        added
    }

    /// Current level as a whole percentage of max
    pub fn percent(&self) -> u32 {
        percent_of(self.current, self.max)
    }

    /// `percent`% of max, rounded down
    pub fn share(&self, percent: u32) -> u32 {
        share_of(self.max, percent)
    }
}

/// `part` as a whole percentage of `whole`, zero when `whole` is zero
pub(crate) fn percent_of(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (u64::from(part) * 100 / u64::from(whole)) as u32
}

/// `percent`% of `whole`, rounded down and capped at `whole`
pub(crate) fn share_of(whole: u32, percent: u32) -> u32 {
    (u64::from(whole) * u64::from(percent.min(100)) / 100) as u32
}

/// Complete per-session state for one ship or contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    // === Identity ===
    pub id: CombatantId,
    pub name: String,
    pub disposition: Disposition,

    // === Structure ===
    pub hull: u32,
    pub max_hull: u32,
    pub armor: u32,

    // === Systems ===
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(default)]
    pub power: Option<ResourcePool>,
    #[serde(default)]
    pub fuel: Option<ResourcePool>,
    /// Fire control software bonus to attack rolls
    #[serde(default)]
    pub fire_control: i32,
    /// Set when drives are dead and the ship cannot manoeuvre
    #[serde(default)]
    pub drifting: bool,

    // === Damage ===
    #[serde(default)]
    pub criticals: Vec<CriticalRecord>,
}

impl Combatant {
    /// Create an undamaged combatant with no weapons or crew
    pub fn new(id: impl Into<CombatantId>, name: impl Into<String>, max_hull: u32, armor: u32) -> Self {
        Combatant {
            id: id.into(),
            name: name.into(),
            disposition: Disposition::Neutral,
            hull: max_hull,
            max_hull,
            armor,
            weapons: Vec::new(),
            crew: Vec::new(),
            power: None,
            fuel: None,
            fire_control: 0,
            drifting: false,
            criticals: Vec::new(),
        }
    }

    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_crew(mut self, member: CrewMember) -> Self {
        self.crew.push(member);
        self
    }

    pub fn with_power(mut self, max: u32) -> Self {
        self.power = Some(ResourcePool::full(max));
        self
    }

    pub fn with_fuel(mut self, max: u32) -> Self {
        self.fuel = Some(ResourcePool::full(max));
        self
    }

    pub fn with_fire_control(mut self, bonus: i32) -> Self {
        self.fire_control = bonus;
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.hull == 0 || self.disposition == Disposition::Destroyed
    }

    pub fn is_friendly(&self) -> bool {
        self.disposition == Disposition::Friendly
    }

    /// Hull remaining as a whole percentage of max
    pub fn hull_percent(&self) -> u32 {
        percent_of(self.hull, self.max_hull)
    }

    // === Criticals ===

    /// Sum of unrepaired critical severities at a location
    pub fn total_active_severity(&self, location: SystemLocation) -> u32 {
        self.active_criticals(location).map(|c| c.severity).sum()
    }

    /// Unrepaired critical records at a location
    pub fn active_criticals(
        &self,
        location: SystemLocation,
    ) -> impl Iterator<Item = &CriticalRecord> + '_ {
        self.criticals
            .iter()
            .filter(move |c| c.location == location && c.is_active())
    }

    // === Weapons ===

    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.name == name)
    }

    pub fn weapon_mut(&mut self, name: &str) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.name == name)
    }

    // === Crew ===

    pub fn living_crew(&self) -> impl Iterator<Item = &CrewMember> + '_ {
        self.crew.iter().filter(|c| c.is_alive())
    }

    /// Headcount of living crew, optionally restricted to one role
    pub fn crew_count(&self, role: Option<CrewRole>) -> u32 {
        self.living_crew()
            .filter(|c| role.map_or(true, |r| c.role == r))
            .count() as u32
    }

    /// Best living skill in a role.
    ///
    /// Ships without a crew roster are treated as abstractly crewed at skill 0;
    /// a roster with nobody alive in the role is unskilled.
    pub fn skill_for(&self, role: CrewRole) -> i32 {
        if self.crew.is_empty() {
            return 0;
        }
        self.living_crew()
            .filter(|c| c.role == role)
            .map(|c| c.skill)
            .max()
            .unwrap_or(UNSKILLED_DM)
    }
}
