//! Snapshots for drill resets and full-state export for persistence

use super::SessionState;
use crate::combatant::Combatant;
use crate::missile::MissileTracker;
use serde::{Deserialize, Serialize};

/// Deep copy of the session taken by `create_snapshot`. Resetting to it
/// always lands in DrillActive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ship: Option<Combatant>,
    pub contacts: Vec<Combatant>,
    /// Missiles in flight at capture time
    #[serde(default)]
    pub missiles: MissileTracker,
    /// Version the snapshot was taken at
    pub taken_at_version: u64,
}

/// Everything needed to rebuild a session after a restart or to sync a
/// reconnecting client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullState {
    pub state: SessionState,
    pub version: u64,
    pub ship: Option<Combatant>,
    pub contacts: Vec<Combatant>,
    #[serde(default)]
    pub missiles: MissileTracker,
    #[serde(default)]
    pub snapshot: Option<Snapshot>,
}

impl FullState {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
