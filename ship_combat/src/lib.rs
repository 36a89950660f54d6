//! ship_combat - Starship combat resolution for Traveller 2e
//!
//! This library provides:
//! - Dice: seeded and unseeded rolling, `NdM` notation
//! - Attack resolution: 2D to-hit, damage through armour, ion drain
//! - Critical hits: location table and cascading subsystem effects
//! - Missiles: multi-round flight tracking and point defence
//! - Boarding: troop strength and opposed assault rolls
//! - BattleState: the per-session state machine owning ships, contacts,
//!   missiles in flight and the drill snapshot

pub mod attack;
pub mod battle;
pub mod boarding;
pub mod combatant;
pub mod config;
pub mod critical;
pub mod dice;
pub mod error;
pub mod missile;
pub mod prelude;
pub mod types;

// Re-export core types for convenience
pub use attack::{resolve_attack, resolve_attack_seeded, AttackOptions, AttackResult};
pub use battle::{
    BattleState, CriticalOutcome, DamageEvent, DamageSource, FireOutcome, FullState,
    SessionState, Snapshot,
};
pub use boarding::{
    can_board, resolve_boarding, resolve_boarding_action, BoardingForce, BoardingParams,
    BoardingResult, Resistance,
};
pub use combatant::{Combatant, CrewMember, CrewRole, ResourcePool, Weapon, WeaponKind};
pub use config::{ConfigError, SessionConfig};
pub use critical::{calculate_severity, CriticalEffect, CriticalRecord};
pub use dice::{roll, roll_2d6, roll_notation, validate_roll, DiceExpr, DiceRoll, SeededRng};
pub use error::{CombatError, Result};
pub use missile::{MissileImpact, MissileTracker, PointDefense, TurretSize};
pub use types::{CombatantId, Disposition, MissileId, RangeBand, SystemLocation};
