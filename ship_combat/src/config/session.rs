//! Per-session tunables

use super::{load_toml, parse_toml, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for one battle session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub missiles: MissileConfig,
    #[serde(default)]
    pub damage: DamageConfig,
}

impl SessionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: SessionConfig = load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.missiles.retain_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "missiles.retain_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissileConfig {
    /// Rounds a resolved missile stays listed before cleanup drops it
    #[serde(default = "default_retain_rounds")]
    pub retain_rounds: u32,
}

impl Default for MissileConfig {
    fn default() -> Self {
        MissileConfig {
            retain_rounds: default_retain_rounds(),
        }
    }
}

fn default_retain_rounds() -> u32 {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageConfig {
    /// Add a severity 1 hull critical each time hull loss crosses a 10% mark
    #[serde(default = "default_true")]
    pub sustained_damage: bool,
    /// Exploding weapons also score a severity 1 hull critical
    #[serde(default = "default_true")]
    pub weapon_explosion_hull_crit: bool,
}

impl Default for DamageConfig {
    fn default() -> Self {
        DamageConfig {
            sustained_damage: true,
            weapon_explosion_hull_crit: true,
        }
    }
}

fn default_true() -> bool {
    true
}
