//! Damage control - field repairs of critical hits

use crate::combatant::Combatant;
use crate::dice::roll_2d6_with_rng;
use crate::types::SystemLocation;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 2D + Engineer - severity must reach this to patch a system
pub const REPAIR_TARGET: i32 = 8;

/// Result of a damage control attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairOutcome {
    pub location: SystemLocation,
    /// Severity of the record targeted; `None` when nothing needed repair
    pub severity: Option<u32>,
    pub roll: i32,
    pub total: i32,
    pub success: bool,
    /// Total active severity at the location after the attempt
    pub remaining_severity: u32,
    pub message: String,
}

/// Attempt a field repair of the worst unrepaired critical at `location`.
///
/// A success marks that single record repaired and flags it temporary; when
/// the patch fails is up to the caller's scheduler.
pub fn attempt_repair(
    rng: &mut impl Rng,
    combatant: &mut Combatant,
    location: SystemLocation,
    engineer_skill: i32,
) -> RepairOutcome {
    let worst = combatant
        .criticals
        .iter_mut()
        .filter(|c| c.location == location && c.is_active())
        .max_by_key(|c| c.severity);

    let Some(record) = worst else {
        return RepairOutcome {
            location,
            severity: None,
            roll: 0,
            total: 0,
            success: false,
            remaining_severity: 0,
            message: format!("No damage to repair on {}", location),
        };
    };

    let severity = record.severity;
    let roll = roll_2d6_with_rng(rng).total();
    let total = roll + engineer_skill - severity as i32;
    let success = total >= REPAIR_TARGET;
    if success {
        record.mark_temporary_repair();
    }

    let remaining_severity = combatant.total_active_severity(location);
    let message = if success {
        format!("{} patched (severity {} fixed, temporary)", location, severity)
    } else {
        format!("Repair of {} failed ({} vs {})", location, total, REPAIR_TARGET)
    };

    RepairOutcome {
        location,
        severity: Some(severity),
        roll,
        total,
        success,
        remaining_severity,
        message,
    }
}

/// Re-open the most recent temporary repair at `location`.
///
/// Called by the external scheduler when a field patch gives out. Returns
/// the severity that became active again, if any.
pub fn expire_temporary_repair(combatant: &mut Combatant, location: SystemLocation) -> Option<u32> {
    let record = combatant
        .criticals
        .iter_mut()
        .filter(|c| c.location == location && c.repaired && c.temporary_repair)
        .max_by_key(|c| c.repaired_at_ms)?;
    record.reopen();
    Some(record.severity)
}
