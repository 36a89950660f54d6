//! Dice notation parsing (`NdM`, with an optional flat modifier)

use crate::error::CombatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parsed dice expression such as `4d6` or `2d6+3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub const fn new(count: u32, sides: u32) -> Self {
        DiceExpr {
            count,
            sides,
            modifier: 0,
        }
    }

    pub const fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Smallest total this expression can produce
    pub fn min_total(&self) -> i32 {
        i32::try_from(self.count)
            .unwrap_or(i32::MAX)
            .saturating_add(self.modifier)
    }

    /// Largest total this expression can produce, saturating at `i32::MAX`
    pub fn max_total(&self) -> i32 {
        let max = u64::from(self.count) * u64::from(self.sides);
        i32::try_from(max)
            .unwrap_or(i32::MAX)
            .saturating_add(self.modifier)
    }

    /// Whether every total of `count` dice of `sides` plus `modifier` fits in an `i32`
    pub fn total_fits(count: u32, sides: u32, modifier: i32) -> bool {
        let max = i64::from(count) * i64::from(sides) + i64::from(modifier);
        max <= i64::from(i32::MAX)
    }
}

impl FromStr for DiceExpr {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CombatError::InvalidNotation(s.to_string());
        let trimmed = s.trim();

        let (count_str, rest) = trimmed
            .split_once(['d', 'D'])
            .ok_or_else(invalid)?;

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(idx) => {
                let (sides, modifier) = rest.split_at(idx);
                let sign = if modifier.starts_with('-') { -1 } else { 1 };
                let value: i32 = parse_digits(&modifier[1..]).ok_or_else(invalid)?;
                (sides, sign * value)
            }
            None => (rest, 0),
        };

        let count: u32 = parse_digits(count_str).ok_or_else(invalid)?;
        let sides: u32 = parse_digits(sides_str).ok_or_else(invalid)?;
        if count == 0 || sides == 0 || !DiceExpr::total_fits(count, sides, modifier) {
            return Err(invalid());
        }

        Ok(DiceExpr {
            count,
            sides,
            modifier,
        })
    }
}

/// Digits only, no signs or whitespace
fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = CombatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpr> for String {
    fn from(expr: DiceExpr) -> Self {
        expr.to_string()
    }
}
