//! Battle system - turn-based street fighting on a square grid
//!
//! Rioters against police, two action points per unit per turn.
//!
//! Key rules:
//! - Cover on the target's tile cuts incoming damage (half 25%, full 50%)
//! - Only walls block line of sight
//! - Abilities reshape the street: fire, smoke, deployable cover
//! - Whoever is left standing wins

pub mod abilities;
pub mod ai;
pub mod battle_map;
pub mod constants;
pub mod execution;
pub mod position;
pub mod resolution;
pub mod terrain;
pub mod unit_type;
pub mod units;

// Re-exports for convenient access
pub use abilities::AbilityReport;
pub use ai::{AiCommander, AiPersonality, AiTurnReport, Decision};
pub use battle_map::{Grid, Tile};
pub use constants::*;
pub use execution::{
    AttackReport, BattleSnapshot, BattleState, CombatEvent, CombatEventType, CombatLog, Outcome,
    POLICE_DEPLOYMENT, RIOTER_DEPLOYMENT,
};
pub use position::Position;
pub use resolution::{mitigate, resolve_attack, resolve_damage, variance_band, DamageRoll};
pub use terrain::TileKind;
pub use unit_type::{Ability, Archetype, ArchetypeStats, Faction};
pub use units::{Roster, Unit};
