//! Error taxonomy for combat resolution

use crate::battle::SessionState;
use crate::types::{CombatantId, MissileId, RangeBand};
use thiserror::Error;

/// Every failure the engine can report. All are synchronous and leave state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("Invalid dice notation: {0:?}")]
    InvalidNotation(String),

    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("Operation not permitted while session is {0}")]
    InvalidState(SessionState),

    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Combatant already present: {0}")]
    DuplicateCombatant(CombatantId),

    #[error("Weapon {weapon} cannot reach {range} range")]
    OutOfRange { weapon: String, range: RangeBand },

    #[error("Weapon not found: {0}")]
    WeaponNotFound(String),

    #[error("Weapon {0} is disabled or destroyed")]
    WeaponUnavailable(String),

    #[error("Weapon {0} is out of ammunition")]
    OutOfAmmo(String),

    #[error("{0} is not in flight")]
    MissileNotTracking(MissileId),

    #[error("No snapshot available to reset to")]
    NoSnapshot,

    #[error("Target cannot be boarded: {0}")]
    NotBoardable(String),
}

pub type Result<T> = std::result::Result<T, CombatError>;
