//! Boarding outcomes

use crate::dice::DiceRoll;
use serde::{Deserialize, Serialize};

/// Row of the boarding action table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardingOutcome {
    AttackersDefeated,
    AttackersRetreat,
    FightingContinues,
    Success,
    ImmediateControl,
}

/// Result of comparing boarding totals on the action table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingAction {
    pub outcome: BoardingOutcome,
    /// Attacker total minus defender total
    pub diff: i32,
    /// DM the defenders gain if they counter-board
    pub counter_board_dm: i32,
    /// DM carried into the next round of fighting
    pub attacker_dm: i32,
    pub defender_dm: i32,
    /// Rounds until the attackers hold the ship; `None` unless they won
    pub rounds_to_control: Option<u32>,
}

/// How lopsided a boarding fight was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginTier {
    Marginal,
    Solid,
    Decisive,
}

impl MarginTier {
    pub fn from_margin(margin: i32) -> Self {
        match margin.abs() {
            6.. => MarginTier::Decisive,
            3..=5 => MarginTier::Solid,
            _ => MarginTier::Marginal,
        }
    }
}

/// Full record of one boarding attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingResult {
    pub attacker_roll: DiceRoll,
    pub defender_roll: DiceRoll,
    pub attacker_total: i32,
    pub defender_total: i32,
    pub attacker_strength: u32,
    pub defender_strength: u32,
    /// Attacker total minus defender total
    pub margin: i32,
    pub success: bool,
    pub attacker_casualties: u32,
    pub defender_casualties: u32,
    pub tier: MarginTier,
    pub action: BoardingAction,
    pub narration: String,
}

impl BoardingResult {
    pub fn summary(&self) -> String {
        format!(
            "{} ({} vs {}): {}",
            if self.success { "Boarding succeeds" } else { "Boarding repelled" },
            self.attacker_total,
            self.defender_total,
            self.narration
        )
    }
}
