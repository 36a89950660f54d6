//! Damage events and the observers that receive them

use crate::types::{CombatantId, MissileId, SystemLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What caused a hull change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DamageSource {
    Weapon { attacker: CombatantId, weapon: String },
    Missile { missile: MissileId, attacker: CombatantId },
    Critical { location: SystemLocation },
    /// Issued directly by the integration layer (GM fiat, scripted hazards)
    External { reason: String },
}

impl DamageSource {
    pub fn external(reason: impl Into<String>) -> Self {
        DamageSource::External {
            reason: reason.into(),
        }
    }
}

/// Emitted once for every hull change that goes through the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub target_id: CombatantId,
    pub source: DamageSource,
    /// Damage asked for
    pub requested: u32,
    /// Damage taken after clamping to remaining hull
    pub applied: u32,
    pub previous_hull: u32,
    pub new_hull: u32,
    pub destroyed: bool,
    /// Session version after the call that produced this event
    pub version: u64,
}

/// Callback registered with [`crate::battle::BattleState::subscribe`]
pub type DamageObserver = Box<dyn FnMut(&DamageEvent) + Send>;

/// Registered observers, notified in subscription order
#[derive(Default)]
pub(crate) struct Observers {
    callbacks: Vec<DamageObserver>,
}

impl Observers {
    pub(crate) fn push(&mut self, observer: DamageObserver) {
        self.callbacks.push(observer);
    }

    pub(crate) fn notify(&mut self, event: &DamageEvent) {
        for callback in &mut self.callbacks {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
