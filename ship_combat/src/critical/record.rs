//! CriticalRecord - One critical hit against one subsystem

use crate::types::SystemLocation;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Historical record of a critical hit. Records are never deleted, only marked repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalRecord {
    pub location: SystemLocation,
    /// Severity of this single hit (1-6)
    pub severity: u32,
    pub repaired: bool,
    /// Set when the repair is a field fix the external scheduler may expire
    pub temporary_repair: bool,
    /// Milliseconds since the Unix epoch when the hit landed
    pub timestamp_ms: u64,
    #[serde(default)]
    pub repaired_at_ms: Option<u64>,
}

impl CriticalRecord {
    pub fn new(location: SystemLocation, severity: u32) -> Self {
        CriticalRecord {
            location,
            severity: severity.clamp(1, 6),
            repaired: false,
            temporary_repair: false,
            timestamp_ms: now_millis(),
            repaired_at_ms: None,
        }
    }

    /// Unrepaired records count toward total active severity
    pub fn is_active(&self) -> bool {
        !self.repaired
    }

    pub(crate) fn mark_temporary_repair(&mut self) {
        self.repaired = true;
        self.temporary_repair = true;
        self.repaired_at_ms = Some(now_millis());
    }

    pub(crate) fn reopen(&mut self) {
        self.repaired = false;
        self.temporary_repair = false;
        self.repaired_at_ms = None;
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
