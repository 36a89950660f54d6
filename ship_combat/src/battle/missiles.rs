//! Missiles in flight as part of the session: launch, round advance, point
//! defence and cleanup. Impact damage takes the same path as weapon damage.

use super::{BattleState, DamageSource};
use crate::dice::roll_expr_with_rng;
use crate::error::Result;
use crate::missile::{InterceptResult, MissileImpact, PointDefense, MISSILE_DAMAGE};
use crate::types::{CombatantId, MissileId, RangeBand};
use rand::Rng;

impl BattleState {
    /// Put a salvo in flight without a launch roll (scripted or GM launches)
    pub fn launch_missile(
        &mut self,
        attacker_id: &CombatantId,
        target_id: &CombatantId,
        range: RangeBand,
        round: u32,
    ) -> Result<MissileId> {
        self.require_active()?;
        self.require(attacker_id)?;
        self.require(target_id)?;
        let id = self
            .missiles
            .launch(attacker_id.clone(), target_id.clone(), range, round);
        self.commit();
        Ok(id)
    }

    /// Advance every tracking missile one band and resolve arrivals.
    ///
    /// Each arrival rolls 4D minus the target's armour and goes through the
    /// hull damage path, including the sustained-damage check. The whole
    /// round is one version bump; a round with nothing in flight is none.
    pub fn advance_missiles(&mut self, round: u32, rng: &mut impl Rng) -> Result<Vec<MissileImpact>> {
        self.require_active()?;
        if self.missiles.tracking().next().is_none() {
            return Ok(Vec::new());
        }

        let ship = &self.ship;
        let contacts = &self.contacts;
        let arrived = self.missiles.advance(round, |id| {
            ship.iter().chain(contacts.iter()).any(|c| &c.id == id)
        });

        let mut impacts = Vec::with_capacity(arrived.len());
        for id in arrived {
            let Some(missile) = self.missiles.get(id) else {
                continue;
            };
            let target_id = missile.target_id.clone();
            let source = DamageSource::Missile {
                missile: id,
                attacker: missile.attacker_id.clone(),
            };
            let armor = self.require(&target_id)?.armor;

            let damage_roll = roll_expr_with_rng(rng, MISSILE_DAMAGE);
            let damage = (damage_roll.total().max(0) as u32).saturating_sub(armor);
            let event = self.damage_hull(&target_id, damage, source)?;
            let criticals = self.check_sustained_damage(&event, rng)?;
            self.missiles.record_damage(id, event.applied);
            tracing::info!(missile = %id, target = %target_id, damage = event.applied, "missile impact");

            impacts.push(MissileImpact {
                missile_id: id,
                target_id,
                damage_roll,
                armor,
                damage,
                event,
                criticals,
            });
        }

        self.commit();
        for impact in &mut impacts {
            impact.event.version = self.version;
        }
        Ok(impacts)
    }

    /// Fire point defence at a tracking missile. Only an interception changes the session.
    pub fn point_defense(
        &mut self,
        id: MissileId,
        defense: PointDefense,
        rng: &mut impl Rng,
    ) -> Result<InterceptResult> {
        self.require_active()?;
        let result = self.missiles.point_defense(id, defense, rng)?;
        if result.intercepted {
            self.commit();
        }
        Ok(result)
    }

    /// Drop resolved missiles past the configured retention window
    pub fn cleanup_missiles(&mut self, round: u32) -> usize {
        let removed = self
            .missiles
            .cleanup(round, self.config.missiles.retain_rounds);
        if removed > 0 {
            self.commit();
        }
        removed
    }
}
