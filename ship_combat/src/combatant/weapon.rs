//! Weapon - Static weapon definition plus its per-session ammo and damage state

use crate::dice::DiceExpr;
use crate::error::{CombatError, Result};
use crate::types::RangeBand;
use serde::{Deserialize, Serialize};

/// How a weapon's damage is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Lasers, particle beams, sandcasters
    #[default]
    Standard,
    /// Drains power instead of damaging hull
    Ion,
    /// Launched ordnance, resolved by the missile tracker
    Missile,
}

/// Condition of a weapon after weapon criticals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCondition {
    #[default]
    Operational,
    /// Fires with a bane
    Bane,
    Disabled,
    Destroyed,
}

/// Attack DM granted at specific range bands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBonus {
    pub bands: Vec<RangeBand>,
    pub dm: i32,
}

impl RangeBonus {
    /// The +2 missiles receive when launched from long range or further
    pub fn missile_long_range() -> Self {
        RangeBonus {
            bands: vec![RangeBand::Long, RangeBand::VeryLong, RangeBand::Distant],
            dm: 2,
        }
    }
}

/// A ship weapon mount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Damage dice
    pub damage: DiceExpr,
    #[serde(default)]
    pub kind: WeaponKind,
    /// Magazine size; `None` means unlimited
    #[serde(default)]
    pub ammo_capacity: Option<u32>,
    #[serde(default)]
    pub ammo_remaining: u32,
    /// Bands this weapon may fire at; `None` means unrestricted
    #[serde(default)]
    pub ranges: Option<Vec<RangeBand>>,
    #[serde(default)]
    pub range_bonus: Option<RangeBonus>,
    #[serde(default)]
    pub condition: WeaponCondition,
}

impl Weapon {
    /// Create an unrestricted, unlimited-ammo weapon
    pub fn new(name: impl Into<String>, damage: DiceExpr) -> Self {
        Weapon {
            name: name.into(),
            damage,
            kind: WeaponKind::Standard,
            ammo_capacity: None,
            ammo_remaining: 0,
            ranges: None,
            range_bonus: None,
            condition: WeaponCondition::Operational,
        }
    }

    /// Pulse laser: 2D, reaches out to long range
    pub fn pulse_laser() -> Self {
        Weapon::new("Pulse Laser", DiceExpr::new(2, 6)).with_ranges(&[
            RangeBand::Adjacent,
            RangeBand::Close,
            RangeBand::Short,
            RangeBand::Medium,
            RangeBand::Long,
        ])
    }

    /// Beam laser: 1D, reaches out to medium range
    pub fn beam_laser() -> Self {
        Weapon::new("Beam Laser", DiceExpr::new(1, 6)).with_ranges(&[
            RangeBand::Adjacent,
            RangeBand::Close,
            RangeBand::Short,
            RangeBand::Medium,
        ])
    }

    /// Missile rack: 4D, unrestricted range, +2 from long range out
    pub fn missile_rack(ammo: u32) -> Self {
        Weapon::new("Missile Rack", DiceExpr::new(4, 6))
            .with_kind(WeaponKind::Missile)
            .with_ammo(ammo)
            .with_range_bonus(RangeBonus::missile_long_range())
    }

    /// Ion cannon: 7D, drains power instead of damaging hull
    pub fn ion_cannon() -> Self {
        Weapon::new("Ion Cannon", DiceExpr::new(7, 6))
            .with_kind(WeaponKind::Ion)
            .with_ranges(&[
                RangeBand::Adjacent,
                RangeBand::Close,
                RangeBand::Short,
                RangeBand::Medium,
            ])
    }

    pub fn with_kind(mut self, kind: WeaponKind) -> Self {
        self.kind = kind;
        self
    }

    /// Give the weapon a full magazine of `capacity` rounds
    pub fn with_ammo(mut self, capacity: u32) -> Self {
        self.ammo_capacity = Some(capacity);
        self.ammo_remaining = capacity;
        self
    }

    pub fn with_ranges(mut self, bands: &[RangeBand]) -> Self {
        self.ranges = Some(bands.to_vec());
        self
    }

    pub fn with_range_bonus(mut self, bonus: RangeBonus) -> Self {
        self.range_bonus = Some(bonus);
        self
    }

    pub fn is_ion(&self) -> bool {
        self.kind == WeaponKind::Ion
    }

    pub fn is_missile(&self) -> bool {
        self.kind == WeaponKind::Missile
    }

    /// Whether the weapon may fire at the given band
    pub fn can_reach(&self, range: RangeBand) -> bool {
        match &self.ranges {
            Some(bands) => bands.contains(&range),
            None => true,
        }
    }

    /// Attack DM from the weapon's range bonus at the given band
    pub fn range_bonus_dm(&self, range: RangeBand) -> i32 {
        match &self.range_bonus {
            Some(bonus) if bonus.bands.contains(&range) => bonus.dm,
            _ => 0,
        }
    }

    /// Whether the weapon can currently fire at all
    pub fn is_operational(&self) -> bool {
        matches!(
            self.condition,
            WeaponCondition::Operational | WeaponCondition::Bane
        )
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo_capacity.is_none() || self.ammo_remaining > 0
    }

    /// Check the weapon is able to fire at `range` without consuming anything
    pub fn check_can_fire(&self, range: RangeBand) -> Result<()> {
        if !self.is_operational() {
            return Err(CombatError::WeaponUnavailable(self.name.clone()));
        }
        if !self.can_reach(range) {
            return Err(CombatError::OutOfRange {
                weapon: self.name.clone(),
                range,
            });
        }
        if !self.has_ammo() {
            return Err(CombatError::OutOfAmmo(self.name.clone()));
        }
        Ok(())
    }

    /// Spend one round of ammunition
    pub fn consume_ammo(&mut self) -> Result<()> {
        if self.ammo_capacity.is_none() {
            return Ok(());
        }
        if self.ammo_remaining == 0 {
            return Err(CombatError::OutOfAmmo(self.name.clone()));
        }
        self.ammo_remaining -= 1;
        Ok(())
    }

    /// Refill to capacity, or set a specific count (clamped to capacity)
    pub fn reload(&mut self, rounds: Option<u32>) {
        if let Some(capacity) = self.ammo_capacity {
            self.ammo_remaining = rounds.unwrap_or(capacity).min(capacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrestricted_reaches_everything() {
        let weapon = Weapon::new("Sandcaster", DiceExpr::new(1, 6));
        assert!(RangeBand::all().iter().all(|r| weapon.can_reach(*r)));
    }

    #[test]
    fn test_restricted_refuses() {
        let laser = Weapon::beam_laser();
        assert!(laser.can_reach(RangeBand::Medium));
        let err = laser.check_can_fire(RangeBand::Long).unwrap_err();
        assert!(matches!(err, CombatError::OutOfRange { range: RangeBand::Long, .. }));
    }

    #[test]
    fn test_missile_range_bonus() {
        let rack = Weapon::missile_rack(12);
        assert_eq!(rack.range_bonus_dm(RangeBand::Long), 2);
        assert_eq!(rack.range_bonus_dm(RangeBand::Distant), 2);
        assert_eq!(rack.range_bonus_dm(RangeBand::Medium), 0);
    }

    #[test]
    fn test_ammo_runs_out() {
        let mut rack = Weapon::missile_rack(2);
        rack.consume_ammo().unwrap();
        rack.consume_ammo().unwrap();
        assert!(!rack.has_ammo());
        assert!(matches!(rack.consume_ammo(), Err(CombatError::OutOfAmmo(_))));
        assert!(matches!(
            rack.check_can_fire(RangeBand::Short),
            Err(CombatError::OutOfAmmo(_))
        ));

        rack.reload(Some(50));
        assert_eq!(rack.ammo_remaining, 2);
    }

    #[test]
    fn test_unlimited_ammo_never_empties() {
        let mut laser = Weapon::pulse_laser();
        for _ in 0..100 {
            laser.consume_ammo().unwrap();
        }
        assert!(laser.has_ammo());
    }

    #[test]
    fn test_damaged_weapon_refuses() {
        let mut laser = Weapon::pulse_laser();
        laser.condition = WeaponCondition::Bane;
        assert!(laser.check_can_fire(RangeBand::Short).is_ok());
        laser.condition = WeaponCondition::Disabled;
        assert!(matches!(
            laser.check_can_fire(RangeBand::Short),
            Err(CombatError::WeaponUnavailable(_))
        ));
    }
}
