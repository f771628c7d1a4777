//! AI personality configuration loaded from TOML
//!
//! A personality is the full set of numbers the heuristic AI scores with: how much it
//! fears each enemy archetype and how it weighs candidate tiles. Every field has a
//! default, so a personality file only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    APPROACH_PENALTY, COVER_BONUS, CROWDING_PENALTY, CROWDING_RADIUS, DEFAULT_THREAT,
    EXPOSED_TARGET_BONUS, FIRING_POSITION_BONUS, MAX_AI_WEIGHT, PROXIMITY_BONUS_BASE,
    PROXIMITY_FALLOFF, STANDOFF_PENALTY, WOUNDED_BONUS,
};
use crate::battle::unit_type::Archetype;
use crate::core::error::{BattleError, Result};

/// How dangerous each enemy archetype looks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub molotov: i32,
    pub leader: i32,
    pub medic: i32,
    pub brawler: i32,
    pub hacker: i32,
    pub shield_bearer: i32,
    /// Every archetype without an entry of its own
    pub other: i32,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            molotov: 100,
            leader: 80,
            medic: 70,
            brawler: 60,
            hacker: 50,
            shield_bearer: 40,
            other: DEFAULT_THREAT,
        }
    }
}

impl ThreatConfig {
    pub fn threat_of(&self, archetype: Archetype) -> i32 {
        match archetype {
            Archetype::Molotov => self.molotov,
            Archetype::Leader => self.leader,
            Archetype::Medic => self.medic,
            Archetype::Brawler => self.brawler,
            Archetype::Hacker => self.hacker,
            Archetype::ShieldBearer => self.shield_bearer,
            _ => self.other,
        }
    }
}

/// Decision weights for targets and tiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Bonus for a target below half health
    pub wounded_bonus: i32,
    /// Proximity bonus at distance zero, before falloff
    pub proximity_base: i32,
    /// Proximity bonus lost per tile of distance
    pub proximity_falloff: i32,
    /// Bonus for a target standing in the open
    pub exposed_bonus: i32,
    /// Penalty per tile between a candidate tile and the target
    pub approach_penalty: i32,
    /// Penalty per tile away from half range, for stand-off archetypes
    pub standoff_penalty: i32,
    /// Bonus for a candidate tile with cover
    pub cover_bonus: i32,
    /// Bonus for a candidate tile the target can be hit from
    pub firing_position_bonus: i32,
    /// Penalty per enemy close to a candidate tile
    pub crowding_penalty: i32,
    /// How close an enemy has to be to count as crowding
    pub crowding_radius: u32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            wounded_bonus: WOUNDED_BONUS,
            proximity_base: PROXIMITY_BONUS_BASE,
            proximity_falloff: PROXIMITY_FALLOFF,
            exposed_bonus: EXPOSED_TARGET_BONUS,
            approach_penalty: APPROACH_PENALTY,
            standoff_penalty: STANDOFF_PENALTY,
            cover_bonus: COVER_BONUS,
            firing_position_bonus: FIRING_POSITION_BONUS,
            crowding_penalty: CROWDING_PENALTY,
            crowding_radius: CROWDING_RADIUS,
        }
    }
}

/// Complete AI personality configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiPersonality {
    /// Name of this personality (set from filename)
    #[serde(default)]
    pub name: String,
    /// Threat ranking of enemy archetypes
    #[serde(default)]
    pub threat: ThreatConfig,
    /// Target and tile weights
    #[serde(default)]
    pub weights: WeightConfig,
}

impl Default for AiPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            threat: ThreatConfig::default(),
            weights: WeightConfig::default(),
        }
    }
}

impl AiPersonality {
    /// Parse a personality from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let personality: AiPersonality = toml::from_str(contents)?;
        personality.validate()?;
        Ok(personality)
    }

    /// Load a personality file, naming it after the file stem
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut personality = Self::from_toml_str(&contents)?;
        if personality.name.is_empty() {
            personality.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(personality)
    }

    fn validate(&self) -> Result<()> {
        let w = &self.weights;
        let weights = [
            ("wounded_bonus", w.wounded_bonus),
            ("proximity_base", w.proximity_base),
            ("proximity_falloff", w.proximity_falloff),
            ("exposed_bonus", w.exposed_bonus),
            ("approach_penalty", w.approach_penalty),
            ("standoff_penalty", w.standoff_penalty),
            ("cover_bonus", w.cover_bonus),
            ("firing_position_bonus", w.firing_position_bonus),
            ("crowding_penalty", w.crowding_penalty),
        ];
        for (field, value) in weights {
            if !(0..=MAX_AI_WEIGHT).contains(&value) {
                return Err(BattleError::Config(format!(
                    "personality weight {} ({}) must be within 0..={}",
                    field, value, MAX_AI_WEIGHT
                )));
            }
        }

        let t = &self.threat;
        let threats = [
            ("molotov", t.molotov),
            ("leader", t.leader),
            ("medic", t.medic),
            ("brawler", t.brawler),
            ("hacker", t.hacker),
            ("shield_bearer", t.shield_bearer),
            ("other", t.other),
        ];
        for (field, value) in threats {
            if !(-MAX_AI_WEIGHT..=MAX_AI_WEIGHT).contains(&value) {
                return Err(BattleError::Config(format!(
                    "threat {} ({}) must be within -{}..={}",
                    field, value, MAX_AI_WEIGHT, MAX_AI_WEIGHT
                )));
            }
        }

        Ok(())
    }
}

/// Load personality from TOML file
///
/// Loads from `data/ai_personalities/{name}.toml`
pub fn load_personality(name: &str) -> Result<AiPersonality> {
    let mut personality = AiPersonality::load(personality_path(name))?;
    personality.name = name.to_string();
    Ok(personality)
}

/// Get path to personality file
fn personality_path(name: &str) -> PathBuf {
    PathBuf::from("data/ai_personalities").join(format!("{}.toml", name))
}
