//! Attack resolution - roll to hit, damage through armour, critical triggers

mod resolution;
mod result;

pub use resolution::{
    power_degradation_dm, resolve_attack, resolve_attack_seeded, AttackOptions, SENSOR_LOCK_DM,
    TARGET_NUMBER,
};
pub use result::{AttackModifiers, AttackResult, CriticalTrigger};
