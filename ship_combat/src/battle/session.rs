//! Session lifecycle states and the legal moves between them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a battle session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    #[default]
    Idle,
    DrillLoading,
    DrillActive,
    Combat,
    Resetting,
}

impl SessionState {
    pub fn all() -> &'static [SessionState] {
        &[
            SessionState::Idle,
            SessionState::DrillLoading,
            SessionState::DrillActive,
            SessionState::Combat,
            SessionState::Resetting,
        ]
    }

    /// States reachable in one step
    pub fn allowed_transitions(self) -> &'static [SessionState] {
        use SessionState::*;
        match self {
            Idle => &[Combat, DrillLoading],
            DrillLoading => &[DrillActive, Idle],
            DrillActive => &[Combat, Resetting],
            Combat => &[Idle, DrillActive, Resetting],
            Resetting => &[DrillActive, Idle],
        }
    }

    pub fn can_transition_to(self, to: SessionState) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Whether hull damage may be applied in this state
    pub fn accepts_damage(self) -> bool {
        matches!(self, SessionState::DrillActive | SessionState::Combat)
    }

    pub fn name(self) -> &'static str {
        match self {
            SessionState::Idle => "IDLE",
            SessionState::DrillLoading => "DRILL_LOADING",
            SessionState::DrillActive => "DRILL_ACTIVE",
            SessionState::Combat => "COMBAT",
            SessionState::Resetting => "RESETTING",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
