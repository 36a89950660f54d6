//! Core types shared by every resolver

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a ship or contact within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub String);

impl From<&str> for CombatantId {
    fn from(s: &str) -> Self {
        CombatantId(s.to_string())
    }
}

impl From<String> for CombatantId {
    fn from(s: String) -> Self {
        CombatantId(s)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for a missile salvo tracked by the [`crate::missile::MissileTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MissileId(pub u32);

impl fmt::Display for MissileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missile-{}", self.0)
    }
}

/// Space combat range bands, ordered nearest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeBand {
    Adjacent,
    Close,
    Short,
    Medium,
    Long,
    VeryLong,
    Distant,
}

impl RangeBand {
    /// All range bands, nearest first
    pub fn all() -> &'static [RangeBand] {
        &[
            RangeBand::Adjacent,
            RangeBand::Close,
            RangeBand::Short,
            RangeBand::Medium,
            RangeBand::Long,
            RangeBand::VeryLong,
            RangeBand::Distant,
        ]
    }

    /// Attack DM for firing at this range
    pub fn attack_dm(self) -> i32 {
        match self {
            RangeBand::Adjacent | RangeBand::Close => 0,
            RangeBand::Short => 1,
            RangeBand::Medium => 0,
            RangeBand::Long => -2,
            RangeBand::VeryLong => -4,
            RangeBand::Distant => -6,
        }
    }

    /// The next band inward, flooring at adjacent
    pub fn closer(self) -> RangeBand {
        match self {
            RangeBand::Adjacent | RangeBand::Close => RangeBand::Adjacent,
            RangeBand::Short => RangeBand::Close,
            RangeBand::Medium => RangeBand::Short,
            RangeBand::Long => RangeBand::Medium,
            RangeBand::VeryLong => RangeBand::Long,
            RangeBand::Distant => RangeBand::VeryLong,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RangeBand::Adjacent => "adjacent",
            RangeBand::Close => "close",
            RangeBand::Short => "short",
            RangeBand::Medium => "medium",
            RangeBand::Long => "long",
            RangeBand::VeryLong => "very long",
            RangeBand::Distant => "distant",
        }
    }
}

impl fmt::Display for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Standing of a combatant relative to the player ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Friendly,
    Hostile,
    #[default]
    Neutral,
    Disabled,
    Destroyed,
}

/// Ship subsystem hit by a critical. One entry per row of the 2D critical location table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemLocation {
    Sensors,
    PowerPlant,
    Fuel,
    Weapon,
    Armour,
    Hull,
    MDrive,
    Cargo,
    JDrive,
    Crew,
    Computer,
}

impl SystemLocation {
    /// Get all subsystem locations, in critical table order
    pub fn all() -> &'static [SystemLocation] {
        &[
            SystemLocation::Sensors,
            SystemLocation::PowerPlant,
            SystemLocation::Fuel,
            SystemLocation::Weapon,
            SystemLocation::Armour,
            SystemLocation::Hull,
            SystemLocation::MDrive,
            SystemLocation::Cargo,
            SystemLocation::JDrive,
            SystemLocation::Crew,
            SystemLocation::Computer,
        ]
    }

    /// Attack DM for a called shot against this subsystem
    pub fn called_shot_penalty(self) -> i32 {
        match self {
            SystemLocation::Hull => 0,
            SystemLocation::Armour => -1,
            SystemLocation::Weapon | SystemLocation::Fuel | SystemLocation::Cargo => -2,
            SystemLocation::Sensors => -2,
            SystemLocation::MDrive | SystemLocation::JDrive => -4,
            SystemLocation::PowerPlant | SystemLocation::Crew => -4,
            SystemLocation::Computer => -6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SystemLocation::Sensors => "sensors",
            SystemLocation::PowerPlant => "power plant",
            SystemLocation::Fuel => "fuel",
            SystemLocation::Weapon => "weapon",
            SystemLocation::Armour => "armour",
            SystemLocation::Hull => "hull",
            SystemLocation::MDrive => "m-drive",
            SystemLocation::Cargo => "cargo",
            SystemLocation::JDrive => "j-drive",
            SystemLocation::Crew => "crew",
            SystemLocation::Computer => "computer",
        }
    }
}

impl fmt::Display for SystemLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
