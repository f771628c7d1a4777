//! Battle system constants - all tunable values in one place
//!
//! Percentages are integer percent so every floor in the damage math is exact.

// Battle map scale (the fixed street layout)
pub const STREET_WIDTH: i32 = 20;
pub const STREET_HEIGHT: i32 = 15;

// Action economy
pub const MAX_ACTION_POINTS: u32 = 2;
pub const ACTION_COST: u32 = 1;

// Cover (percent of incoming damage absorbed)
pub const FULL_COVER_PERCENT: u32 = 50;
pub const HALF_COVER_PERCENT: u32 = 25;

// Damage variance band (+/- percent of mitigated damage)
pub const DAMAGE_VARIANCE_PERCENT: u32 = 20;

// Abilities
pub const FIRE_DAMAGE: u32 = 20;
pub const HEAL_AMOUNT: u32 = 30;
pub const HEAL_RADIUS: u32 = 2;
pub const INSPIRE_BONUS_AP: u32 = 1;
pub const INSPIRE_RADIUS: u32 = 3;
/// Ignite and smoke cover the 3x3 block around the caster
pub const BLAST_RADIUS: i32 = 1;
/// Upper bound for configured fire, heal and inspire amounts
pub const MAX_ABILITY_AMOUNT: u32 = 1_000;

// Combat log
pub const DEFAULT_LOG_CAPACITY: usize = 8;

// AI target scoring - ADDITIVE
pub const WOUNDED_BONUS: i32 = 30;
pub const PROXIMITY_BONUS_BASE: i32 = 50;
pub const PROXIMITY_FALLOFF: i32 = 5;
pub const EXPOSED_TARGET_BONUS: i32 = 20;
pub const DEFAULT_THREAT: i32 = 50;

// AI position scoring - ADDITIVE
pub const APPROACH_PENALTY: i32 = 3;
pub const STANDOFF_PENALTY: i32 = 5;
pub const COVER_BONUS: i32 = 20;
pub const FIRING_POSITION_BONUS: i32 = 50;
pub const CROWDING_PENALTY: i32 = 15;
pub const CROWDING_RADIUS: u32 = 2;
/// Upper bound (in magnitude) for any personality weight or threat value
pub const MAX_AI_WEIGHT: i32 = 10_000;
