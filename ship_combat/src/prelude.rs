//! Prelude module for convenient imports
//!
//! ```rust
//! use ship_combat::prelude::*;
//! ```

// Core types
pub use crate::types::{CombatantId, Disposition, MissileId, RangeBand, SystemLocation};
pub use crate::combatant::{Combatant, CrewMember, CrewRole, Weapon, WeaponKind};
pub use crate::error::{CombatError, Result};

// Dice
pub use crate::dice::{DiceRoll, SeededRng};

// Resolvers
pub use crate::attack::{AttackOptions, AttackResult};
pub use crate::boarding::{BoardingForce, BoardingParams, BoardingResult, Resistance};
pub use crate::critical::{CriticalEffect, RepairOutcome};
pub use crate::missile::{MissileTracker, PointDefense, TurretSize};

// Session
pub use crate::battle::{BattleState, DamageEvent, DamageSource, FullState, SessionState};

// Config
pub use crate::config::SessionConfig;
