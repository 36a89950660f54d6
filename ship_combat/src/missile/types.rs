//! Missile records and point defence inputs

use crate::battle::{CriticalOutcome, DamageEvent};
use crate::dice::DiceRoll;
use crate::types::{CombatantId, MissileId, RangeBand};
use serde::{Deserialize, Serialize};

/// Where a missile is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissileStatus {
    #[default]
    Tracking,
    /// Shot down by point defence
    Intercepted,
    Impacted,
    /// Lost its target (removed from the session) and self-destructed
    Destroyed,
}

impl MissileStatus {
    pub fn is_resolved(self) -> bool {
        self != MissileStatus::Tracking
    }
}

/// A missile salvo in flight or recently resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Missile {
    pub id: MissileId,
    pub attacker_id: CombatantId,
    pub target_id: CombatantId,
    pub launch_round: u32,
    /// Current band to the target
    pub range: RangeBand,
    pub status: MissileStatus,
    pub resolved_round: Option<u32>,
    pub damage_dealt: u32,
}

/// Turret mounting the point defence weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurretSize {
    #[default]
    Single,
    Double,
    Triple,
}

impl TurretSize {
    /// DM for extra barrels firing on the missile
    pub fn bonus(self) -> i32 {
        match self {
            TurretSize::Single => 0,
            TurretSize::Double => 1,
            TurretSize::Triple => 2,
        }
    }
}

/// A point defence shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDefense {
    pub gunner_skill: i32,
    #[serde(default)]
    pub turret: TurretSize,
    pub round: u32,
}

/// Outcome of a point defence shot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptResult {
    pub missile_id: MissileId,
    pub roll: DiceRoll,
    pub total: i32,
    pub target_number: i32,
    pub intercepted: bool,
}

/// A missile reaching its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissileImpact {
    pub missile_id: MissileId,
    pub target_id: CombatantId,
    pub damage_roll: DiceRoll,
    pub armor: u32,
    /// Damage after armour, before clamping to remaining hull
    pub damage: u32,
    pub event: DamageEvent,
    /// Sustained-damage hull criticals the impact caused
    pub criticals: Vec<CriticalOutcome>,
}
