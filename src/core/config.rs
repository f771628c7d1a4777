//! Battle configuration with documented knobs
//!
//! The numbers that shape a match but are not part of an archetype's stat line live
//! here. Defaults reproduce the standard street battle; a TOML file can override any
//! subset of fields.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    DAMAGE_VARIANCE_PERCENT, DEFAULT_LOG_CAPACITY, FIRE_DAMAGE, HEAL_AMOUNT, INSPIRE_BONUS_AP,
    MAX_ABILITY_AMOUNT,
};
use crate::battle::unit_type::Faction;
use crate::core::error::{BattleError, Result};

/// Who issues commands for a faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    /// Commands come through the selection-based command surface
    Human,
    /// The AI commander plays the whole turn as soon as the faction becomes active
    Ai,
}

/// Configuration for a single match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seed for the damage variance RNG
    ///
    /// Two matches with the same seed and the same commands play out identically.
    pub seed: u64,

    /// How many combat log lines are kept (oldest dropped first)
    pub combat_log_capacity: usize,

    /// Half-width of the damage band, in percent of mitigated damage
    ///
    /// At 20 an attack lands anywhere in 80%..=120% of its mitigated value.
    /// Zero makes every attack deterministic.
    pub damage_variance_percent: u32,

    /// Damage dealt to a unit standing on a tile the moment it ignites
    pub fire_damage: u32,

    /// Health restored by a heal to each ally in radius
    pub heal_amount: u32,

    /// Action points granted by inspire to each ally in radius
    pub inspire_bonus: u32,

    /// Controller for the rioters (moves first)
    pub rioters: Controller,

    /// Controller for the police
    pub police: Controller,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            combat_log_capacity: DEFAULT_LOG_CAPACITY,
            damage_variance_percent: DAMAGE_VARIANCE_PERCENT,
            fire_damage: FIRE_DAMAGE,
            heal_amount: HEAL_AMOUNT,
            inspire_bonus: INSPIRE_BONUS_AP,
            rioters: Controller::Human,
            police: Controller::Ai,
        }
    }
}

impl BattleConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Same defaults with a different seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Both factions driven by the AI (headless runs)
    pub fn ai_vs_ai(seed: u64) -> Self {
        Self {
            seed,
            rioters: Controller::Ai,
            police: Controller::Ai,
            ..Self::default()
        }
    }

    /// Controller assigned to a faction
    pub fn controller(&self, faction: Faction) -> Controller {
        match faction {
            Faction::Rioters => self.rioters,
            Faction::Police => self.police,
        }
    }

    /// Parse and validate a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: BattleConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.combat_log_capacity == 0 {
            return Err(BattleError::Config(
                "combat_log_capacity must be at least 1".into(),
            ));
        }

        // Past 100 the low end of the band would go negative
        if self.damage_variance_percent > 100 {
            return Err(BattleError::Config(format!(
                "damage_variance_percent ({}) must be <= 100",
                self.damage_variance_percent
            )));
        }

        if self.heal_amount == 0 {
            return Err(BattleError::Config("heal_amount must be positive".into()));
        }

        for (field, value) in [
            ("fire_damage", self.fire_damage),
            ("heal_amount", self.heal_amount),
            ("inspire_bonus", self.inspire_bonus),
        ] {
            if value > MAX_ABILITY_AMOUNT {
                return Err(BattleError::Config(format!(
                    "{} ({}) must be <= {}",
                    field, value, MAX_ABILITY_AMOUNT
                )));
            }
        }

        Ok(())
    }
}
