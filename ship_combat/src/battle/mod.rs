//! Battle state - the authoritative per-session ship and contact state
//!
//! Every public call that changes anything bumps the session version exactly
//! once, however many sub-fields it touches. Hull only ever changes through
//! the damage path here, which also emits [`DamageEvent`]s to observers.

mod actions;
mod events;
mod missiles;
mod session;
mod snapshot;

pub use actions::{CriticalOutcome, FireOutcome};
pub use events::{DamageEvent, DamageObserver, DamageSource};
pub use session::SessionState;
pub use snapshot::{FullState, Snapshot};

use crate::combatant::Combatant;
use crate::config::SessionConfig;
use crate::error::{CombatError, Result};
use crate::missile::MissileTracker;
use crate::types::{CombatantId, Disposition};
use events::Observers;

/// One battle session: the player ship, its contacts, missiles in flight,
/// and the session lifecycle
#[derive(Debug, Default)]
pub struct BattleState {
    state: SessionState,
    version: u64,
    ship: Option<Combatant>,
    contacts: Vec<Combatant>,
    missiles: MissileTracker,
    snapshot: Option<Snapshot>,
    config: SessionConfig,
    observers: Observers,
    /// Events raised by the call in progress, dispatched on commit
    pending: Vec<DamageEvent>,
}

impl BattleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        BattleState {
            config,
            ..Self::default()
        }
    }

    // === Queries ===

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn ship(&self) -> Option<&Combatant> {
        self.ship.as_ref()
    }

    pub fn contacts(&self) -> &[Combatant] {
        &self.contacts
    }

    pub fn missiles(&self) -> &MissileTracker {
        &self.missiles
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Look up the ship or a contact by id
    pub fn combatant(&self, id: &CombatantId) -> Option<&Combatant> {
        self.ship
            .iter()
            .chain(self.contacts.iter())
            .find(|c| &c.id == id)
    }

    pub(crate) fn combatant_mut(&mut self, id: &CombatantId) -> Option<&mut Combatant> {
        self.ship
            .iter_mut()
            .chain(self.contacts.iter_mut())
            .find(|c| &c.id == id)
    }

    pub(crate) fn require(&self, id: &CombatantId) -> Result<&Combatant> {
        self.combatant(id)
            .ok_or_else(|| CombatError::TargetNotFound(id.to_string()))
    }

    pub(crate) fn require_mut(&mut self, id: &CombatantId) -> Result<&mut Combatant> {
        self.combatant_mut(id)
            .ok_or_else(|| CombatError::TargetNotFound(id.to_string()))
    }

    /// Register an observer for damage events
    pub fn subscribe(&mut self, observer: impl FnMut(&DamageEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // === Lifecycle ===

    /// Move to `to` if the transition table allows it
    pub fn transition(&mut self, to: SessionState) -> Result<()> {
        self.check_transition(to)?;
        self.enter(to);
        self.commit();
        Ok(())
    }

    pub fn start_combat(&mut self) -> Result<()> {
        self.transition(SessionState::Combat)
    }

    /// Idle -> DrillLoading, ready for the drill scenario to be loaded
    pub fn begin_drill(&mut self) -> Result<()> {
        self.transition(SessionState::DrillLoading)
    }

    /// DrillLoading -> DrillActive, capturing the loaded scenario as the reset point
    pub fn activate_drill(&mut self) -> Result<()> {
        self.check_transition(SessionState::DrillActive)?;
        let from = self.state;
        self.enter(SessionState::DrillActive);
        if from == SessionState::DrillLoading {
            self.take_snapshot();
        }
        self.commit();
        Ok(())
    }

    /// Return to Idle from combat or an unfinished drill load
    pub fn end_session(&mut self) -> Result<()> {
        self.transition(SessionState::Idle)
    }

    fn check_transition(&self, to: SessionState) -> Result<()> {
        if self.state.can_transition_to(to) {
            Ok(())
        } else {
            tracing::warn!(from = %self.state, to = %to, "rejected session transition");
            Err(CombatError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }

    fn enter(&mut self, to: SessionState) {
        tracing::info!(from = %self.state, to = %to, "session transition");
        self.state = to;
    }

    fn require_active(&self) -> Result<()> {
        if self.state.accepts_damage() {
            Ok(())
        } else {
            Err(CombatError::InvalidState(self.state))
        }
    }

    /// Finish a mutating call: bump the version once and dispatch queued events
    fn commit(&mut self) -> Vec<DamageEvent> {
        self.version += 1;
        let mut events = std::mem::take(&mut self.pending);
        for event in &mut events {
            event.version = self.version;
            self.observers.notify(event);
        }
        events
    }

    // === Roster ===

    /// Install the player ship. Only while setting up (Idle or DrillLoading).
    pub fn load_ship(&mut self, ship: Combatant) -> Result<()> {
        if !matches!(self.state, SessionState::Idle | SessionState::DrillLoading) {
            return Err(CombatError::InvalidState(self.state));
        }
        if self.contacts.iter().any(|c| c.id == ship.id) {
            return Err(CombatError::DuplicateCombatant(ship.id));
        }
        self.ship = Some(ship);
        self.commit();
        Ok(())
    }

    pub fn add_contact(&mut self, contact: Combatant) -> Result<()> {
        if self.state == SessionState::Resetting {
            return Err(CombatError::InvalidState(self.state));
        }
        if self.combatant(&contact.id).is_some() {
            return Err(CombatError::DuplicateCombatant(contact.id));
        }
        tracing::debug!(contact = %contact.id, "contact added");
        self.contacts.push(contact);
        self.commit();
        Ok(())
    }

    pub fn remove_contact(&mut self, id: &CombatantId) -> Result<Combatant> {
        let index = self
            .contacts
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| CombatError::TargetNotFound(id.to_string()))?;
        let removed = self.contacts.remove(index);
        self.commit();
        Ok(removed)
    }

    pub fn set_disposition(&mut self, id: &CombatantId, disposition: Disposition) -> Result<()> {
        self.require_mut(id)?.disposition = disposition;
        self.commit();
        Ok(())
    }

    /// Refill a weapon's magazine, or set an explicit round count
    pub fn reload_weapon(&mut self, id: &CombatantId, weapon: &str, rounds: Option<u32>) -> Result<()> {
        let combatant = self.require_mut(id)?;
        let weapon = combatant
            .weapon_mut(weapon)
            .ok_or_else(|| CombatError::WeaponNotFound(weapon.to_string()))?;
        weapon.reload(rounds);
        self.commit();
        Ok(())
    }

    // === Damage ===

    /// Apply hull damage to a ship or contact.
    ///
    /// Legal only in Combat and DrillActive. The amount is clamped to the
    /// remaining hull; reaching zero marks the target destroyed.
    pub fn apply_damage(
        &mut self,
        target_id: &CombatantId,
        amount: i64,
        source: DamageSource,
    ) -> Result<DamageEvent> {
        self.require_active()?;
        if amount < 0 {
            return Err(CombatError::InvalidAmount(amount));
        }
        let amount = u32::try_from(amount).unwrap_or(u32::MAX);
        self.require(target_id)?;

        self.damage_hull(target_id, amount, source)?;
        let mut events = self.commit();
        events
            .pop()
            .ok_or_else(|| CombatError::TargetNotFound(target_id.to_string()))
    }

    /// Hull mutation shared by every damage path. Queues the event; the
    /// caller commits.
    pub(crate) fn damage_hull(
        &mut self,
        target_id: &CombatantId,
        amount: u32,
        source: DamageSource,
    ) -> Result<DamageEvent> {
        let version = self.version;
        let target = self.require_mut(target_id)?;
        let previous_hull = target.hull;
        let applied = amount.min(previous_hull);
        target.hull = previous_hull - applied;
        let destroyed = target.hull == 0;
        if destroyed && target.disposition != Disposition::Destroyed {
            target.disposition = Disposition::Destroyed;
            tracing::info!(target = %target.id, "combatant destroyed");
        }

        let event = DamageEvent {
            target_id: target.id.clone(),
            source,
            requested: amount,
            applied,
            previous_hull,
            new_hull: target.hull,
            destroyed,
            version,
        };
        tracing::debug!(
            target = %event.target_id,
            applied,
            new_hull = event.new_hull,
            "hull damage"
        );
        self.pending.push(event.clone());
        Ok(event)
    }

    // === Snapshots ===

    /// Capture the current ship, contacts and missiles as the reset point.
    /// Overwrites any earlier snapshot.
    pub fn create_snapshot(&mut self) -> Result<u64> {
        self.require_active()?;
        self.take_snapshot();
        Ok(self.commit_version())
    }

    fn take_snapshot(&mut self) {
        self.snapshot = Some(Snapshot {
            ship: self.ship.clone(),
            contacts: self.contacts.clone(),
            missiles: self.missiles.clone(),
            taken_at_version: self.version + 1,
        });
        tracing::info!(version = self.version + 1, "snapshot taken");
    }

    fn commit_version(&mut self) -> u64 {
        self.commit();
        self.version
    }

    /// Restore the snapshot and land in DrillActive.
    ///
    /// Passes through Resetting inside this call; no caller can observe the
    /// intermediate state. The snapshot is kept for further resets.
    pub fn reset(&mut self) -> Result<()> {
        self.check_transition(SessionState::Resetting)?;
        let snapshot = self.snapshot.clone().ok_or(CombatError::NoSnapshot)?;

        self.enter(SessionState::Resetting);
        self.ship = snapshot.ship;
        self.contacts = snapshot.contacts;
        self.missiles = snapshot.missiles;
        self.pending.clear();
        self.enter(SessionState::DrillActive);
        self.commit();
        tracing::info!(version = self.version, "session reset to snapshot");
        Ok(())
    }

    /// Tear the session down to Idle with nothing loaded and no snapshot
    pub fn clear(&mut self) {
        self.state = SessionState::Idle;
        self.ship = None;
        self.contacts.clear();
        self.missiles = MissileTracker::new();
        self.snapshot = None;
        self.pending.clear();
        self.commit();
        tracing::info!(version = self.version, "session cleared");
    }

    // === Persistence ===

    pub fn full_state(&self) -> FullState {
        FullState {
            state: self.state,
            version: self.version,
            ship: self.ship.clone(),
            contacts: self.contacts.clone(),
            missiles: self.missiles.clone(),
            snapshot: self.snapshot.clone(),
        }
    }

    /// Replace the session with persisted state.
    ///
    /// The version continues past both the current and the persisted value so
    /// clients holding either see the change.
    pub fn restore_full_state(&mut self, full: FullState) -> Result<()> {
        if let Some(ship) = &full.ship {
            if full.contacts.iter().any(|c| c.id == ship.id) {
                return Err(CombatError::DuplicateCombatant(ship.id.clone()));
            }
        }
        for (i, contact) in full.contacts.iter().enumerate() {
            if full.contacts[..i].iter().any(|c| c.id == contact.id) {
                return Err(CombatError::DuplicateCombatant(contact.id.clone()));
            }
        }

        self.state = full.state;
        self.ship = full.ship;
        self.contacts = full.contacts;
        self.missiles = full.missiles;
        self.snapshot = full.snapshot;
        self.pending.clear();
        self.version = self.version.max(full.version);
        self.commit();
        tracing::info!(state = %self.state, version = self.version, "session restored");
        Ok(())
    }
}
