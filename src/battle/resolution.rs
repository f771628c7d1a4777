//! Attack damage resolution
//!
//! Base damage is cut by the target tile's cover, then rolled inside a bounded band
//! around the mitigated value. Everything is integer percent, so every floor is exact.
//! The only side effect is drawing from the RNG the caller passes in.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::Grid;
use crate::battle::units::Unit;

/// Breakdown of one resolved attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub base: u32,
    pub cover_percent: u32,
    pub mitigated: u32,
    pub low: u32,
    pub high: u32,
    pub dealt: u32,
}

/// Damage left after cover: floor(base * (100 - cover) / 100)
pub fn mitigate(base: u32, cover_percent: u32) -> u32 {
    base * (100 - cover_percent.min(100)) / 100
}

/// Inclusive bounds of the variance band around a mitigated value
pub fn variance_band(mitigated: u32, variance_percent: u32) -> (u32, u32) {
    let variance = variance_percent.min(100);
    let low = mitigated * (100 - variance) / 100;
    let high = mitigated * (100 + variance) / 100;
    (low, high)
}

/// Roll damage for `base` landing on a tile with `cover_percent` cover
pub fn resolve_damage<R: Rng + ?Sized>(
    base: u32,
    cover_percent: u32,
    variance_percent: u32,
    rng: &mut R,
) -> DamageRoll {
    let mitigated = mitigate(base, cover_percent);
    let (low, high) = variance_band(mitigated, variance_percent);
    let dealt = rng.gen_range(low..=high);

    DamageRoll {
        base,
        cover_percent,
        mitigated,
        low,
        high,
        dealt,
    }
}

/// Roll damage for `attacker` hitting `target` where it currently stands
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &Unit,
    target: &Unit,
    grid: &Grid,
    variance_percent: u32,
    rng: &mut R,
) -> DamageRoll {
    let cover = grid.cover_percent(target.position).unwrap_or(0);
    resolve_damage(attacker.stats().damage, cover, variance_percent, rng)
}
