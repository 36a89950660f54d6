//! Missile tracker - salvos in flight, round advance, point defence
//!
//! Missiles close one band per round along [`flight_step`] and hit
//! automatically on reaching adjacent range. The tracker only keeps flight
//! state; the owning [`crate::battle::BattleState`] rolls impact damage and
//! routes it through its damage path.

mod types;

pub use types::{
    InterceptResult, Missile, MissileImpact, MissileStatus, PointDefense, TurretSize,
};

use crate::dice::{roll_2d6_with_rng, DiceExpr};
use crate::error::{CombatError, Result};
use crate::types::{CombatantId, MissileId, RangeBand};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Point defence needs 2D + skill + turret DM of 8+
pub const INTERCEPT_TARGET: i32 = 8;

/// Impact damage for a standard missile
pub const MISSILE_DAMAGE: DiceExpr = DiceExpr::new(4, 6);

/// Next band on a missile's approach.
///
/// Missiles cross close range in the same round they leave short, so a
/// salvo launched at long range arrives on its third advance.
pub fn flight_step(range: RangeBand) -> RangeBand {
    match range {
        RangeBand::Distant => RangeBand::VeryLong,
        RangeBand::VeryLong => RangeBand::Long,
        RangeBand::Long => RangeBand::Medium,
        RangeBand::Medium => RangeBand::Short,
        RangeBand::Short | RangeBand::Close | RangeBand::Adjacent => RangeBand::Adjacent,
    }
}

/// Missiles belonging to one battle session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissileTracker {
    missiles: Vec<Missile>,
    next_id: u32,
}

impl Default for MissileTracker {
    fn default() -> Self {
        MissileTracker {
            missiles: Vec::new(),
            next_id: 1,
        }
    }
}

impl MissileTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    pub fn get(&self, id: MissileId) -> Option<&Missile> {
        self.missiles.iter().find(|m| m.id == id)
    }

    /// Every missile still held, in launch order
    pub fn missiles(&self) -> &[Missile] {
        &self.missiles
    }

    pub fn tracking(&self) -> impl Iterator<Item = &Missile> + '_ {
        self.missiles
            .iter()
            .filter(|m| m.status == MissileStatus::Tracking)
    }

    /// Missiles in flight toward `target_id`
    pub fn inbound(&self, target_id: &CombatantId) -> impl Iterator<Item = &Missile> + '_ {
        let target_id = target_id.clone();
        self.tracking().filter(move |m| m.target_id == target_id)
    }

    // === Operations ===

    /// Put a salvo in flight at `range`
    pub fn launch(
        &mut self,
        attacker_id: CombatantId,
        target_id: CombatantId,
        range: RangeBand,
        round: u32,
    ) -> MissileId {
        let id = MissileId(self.next_id);
        self.next_id += 1;
        tracing::debug!(missile = %id, attacker = %attacker_id, target = %target_id, range = %range, "missile launched");
        self.missiles.push(Missile {
            id,
            attacker_id,
            target_id,
            launch_round: round,
            range,
            status: MissileStatus::Tracking,
            resolved_round: None,
            damage_dealt: 0,
        });
        id
    }

    /// Move every tracking missile one band closer.
    ///
    /// Missiles whose target is no longer present self-destruct. Arrivals are
    /// marked impacted and returned in launch order for damage resolution.
    pub fn advance(&mut self, round: u32, target_present: impl Fn(&CombatantId) -> bool) -> Vec<MissileId> {
        let mut arrived = Vec::new();
        for missile in self
            .missiles
            .iter_mut()
            .filter(|m| m.status == MissileStatus::Tracking)
        {
            if !target_present(&missile.target_id) {
                missile.status = MissileStatus::Destroyed;
                missile.resolved_round = Some(round);
                tracing::debug!(missile = %missile.id, "target lost, missile self-destructs");
                continue;
            }

            missile.range = flight_step(missile.range);
            if missile.range == RangeBand::Adjacent {
                missile.status = MissileStatus::Impacted;
                missile.resolved_round = Some(round);
                arrived.push(missile.id);
            }
        }
        arrived
    }

    /// Record the hull damage an impacted missile dealt
    pub(crate) fn record_damage(&mut self, id: MissileId, applied: u32) {
        if let Some(missile) = self.missiles.iter_mut().find(|m| m.id == id) {
            missile.damage_dealt = applied;
        }
    }

    /// Fire point defence at a tracking missile
    pub fn point_defense(
        &mut self,
        id: MissileId,
        defense: PointDefense,
        rng: &mut impl Rng,
    ) -> Result<InterceptResult> {
        let missile = self
            .missiles
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| CombatError::TargetNotFound(id.to_string()))?;
        if missile.status != MissileStatus::Tracking {
            return Err(CombatError::MissileNotTracking(id));
        }

        let roll = roll_2d6_with_rng(rng);
        let total = roll.total() + defense.gunner_skill + defense.turret.bonus();
        let intercepted = total >= INTERCEPT_TARGET;
        if intercepted {
            missile.status = MissileStatus::Intercepted;
            missile.resolved_round = Some(defense.round);
        }
        tracing::debug!(missile = %id, total, intercepted, "point defence");

        Ok(InterceptResult {
            missile_id: id,
            roll,
            total,
            target_number: INTERCEPT_TARGET,
            intercepted,
        })
    }

    /// Drop resolved missiles held for `retain_rounds` past resolution. Returns how many went.
    pub fn cleanup(&mut self, round: u32, retain_rounds: u32) -> usize {
        let before = self.missiles.len();
        self.missiles.retain(|m| match m.resolved_round {
            Some(resolved) => round < resolved.saturating_add(retain_rounds),
            None => true,
        });
        before - self.missiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SeededRng;

    fn present(_: &CombatantId) -> bool {
        true
    }

    #[test]
    fn test_flight_path_from_long() {
        let mut range = RangeBand::Long;
        let mut steps = 0;
        while range != RangeBand::Adjacent {
            range = flight_step(range);
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(flight_step(RangeBand::Distant), RangeBand::VeryLong);
        assert_eq!(flight_step(RangeBand::Adjacent), RangeBand::Adjacent);
    }

    #[test]
    fn test_long_range_arrives_on_third_advance() {
        let mut tracker = MissileTracker::new();
        let id = tracker.launch("ship".into(), "pirate".into(), RangeBand::Long, 1);

        assert!(tracker.advance(2, present).is_empty());
        assert!(tracker.advance(3, present).is_empty());
        assert_eq!(tracker.get(id).unwrap().range, RangeBand::Short);

        assert_eq!(tracker.advance(4, present), vec![id]);
        let missile = tracker.get(id).unwrap();
        assert_eq!(missile.status, MissileStatus::Impacted);
        assert_eq!(missile.resolved_round, Some(4));
        assert!(tracker.advance(5, present).is_empty());
    }

    #[test]
    fn test_intercept_prevents_arrival() {
        let mut tracker = MissileTracker::new();
        let mut rng = SeededRng::new(5);
        let id = tracker.launch("ship".into(), "pirate".into(), RangeBand::Long, 1);
        tracker.advance(2, present);

        let defense = PointDefense {
            gunner_skill: 6,
            turret: TurretSize::Triple,
            round: 2,
        };
        let result = tracker.point_defense(id, defense, &mut rng).unwrap();
        assert!(result.intercepted);
        assert_eq!(tracker.get(id).unwrap().status, MissileStatus::Intercepted);

        for round in 3..8 {
            assert!(tracker.advance(round, present).is_empty());
        }

        let err = tracker.point_defense(id, defense, &mut rng).unwrap_err();
        assert_eq!(err, CombatError::MissileNotTracking(id));
    }

    #[test]
    fn test_failed_intercept_keeps_tracking() {
        let mut tracker = MissileTracker::new();
        let id = tracker.launch("ship".into(), "pirate".into(), RangeBand::Medium, 1);
        let defense = PointDefense {
            gunner_skill: -10,
            turret: TurretSize::Single,
            round: 1,
        };
        let result = tracker.point_defense(id, defense, &mut SeededRng::new(1)).unwrap();
        assert!(!result.intercepted);
        assert_eq!(tracker.get(id).unwrap().status, MissileStatus::Tracking);
    }

    #[test]
    fn test_point_defense_unknown_missile() {
        let mut tracker = MissileTracker::new();
        let defense = PointDefense {
            gunner_skill: 0,
            turret: TurretSize::Single,
            round: 1,
        };
        let err = tracker
            .point_defense(MissileId(99), defense, &mut SeededRng::new(1))
            .unwrap_err();
        assert!(matches!(err, CombatError::TargetNotFound(_)));
    }

    #[test]
    fn test_missing_target_self_destructs() {
        let mut tracker = MissileTracker::new();
        let id = tracker.launch("ship".into(), "pirate".into(), RangeBand::Short, 1);
        assert!(tracker.advance(2, |_| false).is_empty());
        let missile = tracker.get(id).unwrap();
        assert_eq!(missile.status, MissileStatus::Destroyed);
        assert_eq!(missile.resolved_round, Some(2));
    }

    #[test]
    fn test_cleanup_respects_retention() {
        let mut tracker = MissileTracker::new();
        let done = tracker.launch("ship".into(), "pirate".into(), RangeBand::Short, 1);
        let flying = tracker.launch("ship".into(), "pirate".into(), RangeBand::Distant, 1);
        tracker.advance(3, present);
        assert_eq!(tracker.get(done).unwrap().status, MissileStatus::Impacted);

        assert_eq!(tracker.cleanup(4, 2), 0);
        assert_eq!(tracker.cleanup(5, 2), 1);
        assert!(tracker.get(done).is_none());
        assert!(tracker.get(flying).is_some());
    }

    #[test]
    fn test_ids_and_inbound() {
        let mut tracker = MissileTracker::new();
        let a = tracker.launch("ship".into(), "pirate".into(), RangeBand::Long, 1);
        let b = tracker.launch("ship".into(), "trader".into(), RangeBand::Long, 1);
        assert_eq!(a, MissileId(1));
        assert_eq!(b, MissileId(2));
        assert_eq!(tracker.inbound(&"pirate".into()).count(), 1);
        assert_eq!(tracker.tracking().count(), 2);
    }
}
