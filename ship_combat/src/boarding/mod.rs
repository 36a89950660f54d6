//! Boarding actions - troop strength, opposed assault rolls, casualties

mod result;

pub use result::{BoardingAction, BoardingOutcome, BoardingResult, MarginTier};

use crate::combatant::{Combatant, CrewRole};
use crate::dice::roll_2d6_with_rng;
use crate::types::Disposition;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How hard the defenders fight back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resistance {
    Light,
    #[default]
    Moderate,
    Heavy,
    Desperate,
}

impl Resistance {
    /// DM added to the defender's roll
    pub fn dm(self) -> i32 {
        match self {
            Resistance::Light => 0,
            Resistance::Moderate => 2,
            Resistance::Heavy => 4,
            Resistance::Desperate => 6,
        }
    }
}

/// One side of a boarding action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardingForce {
    pub crew: u32,
    pub marines: u32,
    /// Melee skill of the attackers, or the defenders' best relevant skill
    pub skill: i32,
    pub armor_rating: u32,
    pub weapons_rating: u32,
}

impl BoardingForce {
    /// Build a force from a combatant's living roster
    pub fn from_combatant(combatant: &Combatant, armor_rating: u32, weapons_rating: u32) -> Self {
        let marines = combatant.crew_count(Some(CrewRole::Marine));
        let crew = combatant.crew_count(None) - marines;
        let skill = if marines > 0 {
            combatant.skill_for(CrewRole::Marine)
        } else {
            combatant.living_crew().map(|c| c.skill).max().unwrap_or(0)
        };
        BoardingForce {
            crew,
            marines,
            skill,
            armor_rating,
            weapons_rating,
        }
    }

    /// Headcount
    pub fn size(&self) -> u32 {
        self.crew + self.marines
    }

    /// Crew count + 2 per marine, +1 for heavy armour, +1 for heavy weapons
    pub fn troop_strength(&self) -> u32 {
        let mut strength = self.crew + 2 * self.marines;
        if self.armor_rating > 5 {
            strength += 1;
        }
        if self.weapons_rating >= 2 {
            strength += 1;
        }
        strength
    }
}

/// Inputs to a boarding action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingParams {
    pub attacker: BoardingForce,
    pub defender: BoardingForce,
    pub resistance: Resistance,
}

/// Outcome of [`can_board`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingEligibility {
    pub allowed: bool,
    pub reason: String,
}

/// DM for weight of numbers: whole doublings of the headcount
pub fn numbers_bonus(count: u32) -> i32 {
    if count == 0 {
        0
    } else {
        count.ilog2() as i32
    }
}

/// DM from comparing troop strengths
pub fn strength_dm(attacker_strength: u32, defender_strength: u32) -> i32 {
    let (a, d) = (attacker_strength, defender_strength);
    if a >= d.saturating_mul(2) && a > d {
        2
    } else if a > d {
        1
    } else if a == d {
        0
    } else if a.saturating_mul(2) <= d {
        -2
    } else {
        -1
    }
}

/// Whether a boarding party may dock with `target`
pub fn can_board(target: &Combatant) -> BoardingEligibility {
    let (allowed, reason) = if target.is_friendly() {
        (false, "Cannot board a friendly vessel".to_string())
    } else if target.hull == 0 {
        (true, format!("{} is a wreck", target.name))
    } else if u64::from(target.hull) * 4 <= u64::from(target.max_hull) {
        (
            true,
            format!("{} is crippled ({}% hull)", target.name, target.hull_percent()),
        )
    } else if target.disposition == Disposition::Disabled || target.drifting {
        (true, format!("{} is disabled and drifting", target.name))
    } else {
        (
            false,
            format!("{} is still under power and manoeuvring", target.name),
        )
    };
    BoardingEligibility { allowed, reason }
}

/// Read the boarding action table for two final totals
pub fn resolve_boarding_action(attacker_total: i32, defender_total: i32) -> BoardingAction {
    let diff = attacker_total - defender_total;
    let mut action = BoardingAction {
        outcome: BoardingOutcome::FightingContinues,
        diff,
        counter_board_dm: 0,
        attacker_dm: 0,
        defender_dm: 0,
        rounds_to_control: None,
    };

    match diff {
        i32::MIN..=-6 => {
            action.outcome = BoardingOutcome::AttackersDefeated;
            action.counter_board_dm = 4;
        }
        -5..=-3 => {
            action.outcome = BoardingOutcome::AttackersRetreat;
            action.counter_board_dm = 2;
        }
        -2..=-1 => action.defender_dm = 1,
        0 => {}
        1..=2 => action.attacker_dm = 1,
        3..=5 => {
            action.outcome = BoardingOutcome::Success;
            action.rounds_to_control = Some((6 - diff) as u32);
        }
        _ => {
            action.outcome = BoardingOutcome::ImmediateControl;
            action.rounds_to_control = Some(0);
        }
    }

    action
}

/// Resolve a boarding action.
///
/// Attacker: 2D + skill + strength DM + numbers bonus for marines.
/// Defender: 2D + skill + resistance DM + numbers bonus for headcount.
/// Ties go to the attackers.
pub fn resolve_boarding(params: &BoardingParams, rng: &mut impl Rng) -> BoardingResult {
    let attacker = &params.attacker;
    let defender = &params.defender;
    let attacker_strength = attacker.troop_strength();
    let defender_strength = defender.troop_strength();

    let attacker_roll = roll_2d6_with_rng(rng);
    let defender_roll = roll_2d6_with_rng(rng);

    let attacker_total = attacker_roll.total()
        + attacker.skill
        + strength_dm(attacker_strength, defender_strength)
        + numbers_bonus(attacker.marines);
    let defender_total = defender_roll.total()
        + defender.skill
        + params.resistance.dm()
        + numbers_bonus(defender.size());

    let margin = attacker_total - defender_total;
    let success = margin >= 0;
    let winner_losses = (margin.unsigned_abs()) / 3;
    let loser_losses = margin.unsigned_abs();
    let (attacker_casualties, defender_casualties) = if success {
        (winner_losses, loser_losses)
    } else {
        (loser_losses, winner_losses)
    };
    let attacker_casualties = attacker_casualties.min(attacker.size());
    let defender_casualties = defender_casualties.min(defender.size());

    let tier = MarginTier::from_margin(margin);
    let action = resolve_boarding_action(attacker_total, defender_total);
    let narration = narrate(success, tier, attacker_casualties, defender_casualties);

    tracing::debug!(
        attacker_total,
        defender_total,
        margin,
        success,
        "boarding resolved"
    );

    BoardingResult {
        attacker_roll,
        defender_roll,
        attacker_total,
        defender_total,
        attacker_strength,
        defender_strength,
        margin,
        success,
        attacker_casualties,
        defender_casualties,
        tier,
        action,
        narration,
    }
}

fn narrate(success: bool, tier: MarginTier, attacker_losses: u32, defender_losses: u32) -> String {
    let headline = match (success, tier) {
        (true, MarginTier::Decisive) => "The boarders sweep through the ship",
        (true, MarginTier::Solid) => "The boarders fight their way aboard",
        (true, MarginTier::Marginal) => "The boarders gain a narrow foothold",
        (false, MarginTier::Decisive) => "The boarders are routed at the airlock",
        (false, MarginTier::Solid) => "The defenders drive the boarders back",
        (false, MarginTier::Marginal) => "The boarders are held at the airlock",
    };
    format!(
        "{}. Attackers lost {}, defenders lost {}.",
        headline, attacker_losses, defender_losses
    )
}
