//! Dice engine - seeded and unseeded rolling primitives
//!
//! Every resolver in the crate takes `&mut impl Rng` so callers choose the
//! source: `rand::thread_rng()` for live play, [`SeededRng`] when a roll has
//! to be re-derived later (see [`validate_roll`]).

mod lcg;
mod notation;

pub use lcg::SeededRng;
pub use notation::DiceExpr;

use crate::error::{CombatError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome of rolling a group of identical dice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    dice: Vec<u32>,
    sides: u32,
    modifier: i32,
    total: i32,
    seed: Option<u64>,
}

impl DiceRoll {
    fn from_faces(dice: Vec<u32>, sides: u32, modifier: i32, seed: Option<u64>) -> Self {
        let total = sum_faces(&dice, modifier);
        DiceRoll {
            dice,
            sides,
            modifier,
            total,
            seed,
        }
    }

    /// Individual faces in the order they were rolled
    pub fn dice(&self) -> &[u32] {
        &self.dice
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// Sum of faces plus any flat modifier
    pub fn total(&self) -> i32 {
        self.total
    }

    /// Seed that produced this roll, if it was seeded
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Double sixes on a 2d6 check
    pub fn is_boxcars(&self) -> bool {
        self.sides == 6 && self.dice == [6, 6]
    }
}

/// Faces plus modifier, saturating at the `i32` bounds
fn sum_faces(dice: &[u32], modifier: i32) -> i32 {
    let sum = dice.iter().map(|&d| i64::from(d)).sum::<i64>() + i64::from(modifier);
    i32::try_from(sum).unwrap_or(if sum < 0 { i32::MIN } else { i32::MAX })
}

/// Roll `count` dice with `sides` faces.
///
/// With a seed the faces are fully reproducible for the same `(seed, count, sides)`.
pub fn roll(count: u32, sides: u32, seed: Option<u64>) -> Result<DiceRoll> {
    match seed {
        Some(seed) => {
            let mut rng = SeededRng::new(seed);
            let mut result = roll_with_rng(&mut rng, count, sides)?;
            result.seed = Some(seed);
            Ok(result)
        }
        None => roll_with_rng(&mut rand::thread_rng(), count, sides),
    }
}

/// Roll `count` dice with `sides` faces from the provided RNG
pub fn roll_with_rng(rng: &mut impl Rng, count: u32, sides: u32) -> Result<DiceRoll> {
    if sides == 0 || !DiceExpr::total_fits(count, sides, 0) {
        return Err(CombatError::InvalidNotation(format!("{}d{}", count, sides)));
    }
    let faces = (0..count).map(|_| rng.gen_range(1..=sides)).collect();
    Ok(DiceRoll::from_faces(faces, sides, 0, None))
}

/// Roll a parsed expression from the provided RNG
pub fn roll_expr_with_rng(rng: &mut impl Rng, expr: DiceExpr) -> DiceRoll {
    let faces = (0..expr.count)
        .map(|_| rng.gen_range(1..=expr.sides))
        .collect();
    DiceRoll::from_faces(faces, expr.sides, expr.modifier, None)
}

/// Parse and roll a notation string such as `"4d6"`
pub fn roll_notation(notation: &str) -> Result<DiceRoll> {
    let expr: DiceExpr = notation.parse()?;
    Ok(roll_expr_with_rng(&mut rand::thread_rng(), expr))
}

/// Parse and roll a notation string from the provided RNG
pub fn roll_notation_with_rng(rng: &mut impl Rng, notation: &str) -> Result<DiceRoll> {
    let expr: DiceExpr = notation.parse()?;
    Ok(roll_expr_with_rng(rng, expr))
}

/// The universal 2D check
pub fn roll_2d6() -> DiceRoll {
    roll_2d6_with_rng(&mut rand::thread_rng())
}

pub fn roll_2d6_with_rng(rng: &mut impl Rng) -> DiceRoll {
    roll_expr_with_rng(rng, DiceExpr::new(2, 6))
}

/// 2D with a bane: roll three dice and keep the lowest two
pub fn roll_2d6_bane_with_rng(rng: &mut impl Rng) -> DiceRoll {
    let mut faces: Vec<u32> = (0..3).map(|_| rng.gen_range(1..=6)).collect();
    faces.sort_unstable();
    faces.truncate(2);
    DiceRoll::from_faces(faces, 6, 0, None)
}

/// Sum of `count` d6, for damage that never needs the individual faces
pub fn roll_d6_total(rng: &mut impl Rng, count: u32) -> i32 {
    roll_expr_with_rng(rng, DiceExpr::new(count, 6)).total()
}

/// Re-derive a roll from `seed` and compare it die for die.
///
/// Detects client-reported rolls whose faces or total were altered, or which
/// were not produced by the claimed seed.
pub fn validate_roll(roll: &DiceRoll, seed: u64) -> bool {
    if roll.seed.is_some_and(|claimed| claimed != seed) {
        return false;
    }
    if roll.total != sum_faces(&roll.dice, roll.modifier) {
        return false;
    }
    let mut rng = SeededRng::new(seed);
    match roll_with_rng(&mut rng, roll.dice.len() as u32, roll.sides) {
        Ok(expected) => expected.dice == roll.dice,
        Err(_) => false,
    }
}
