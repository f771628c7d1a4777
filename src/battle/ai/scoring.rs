//! Target and tile scoring for the heuristic AI
//!
//! Pure functions over a read-only view of the battle. Scan orders are fixed and ties
//! always go to whatever was found first, so the same position yields the same choice.

use crate::battle::ai::personality::AiPersonality;
use crate::battle::battle_map::Grid;
use crate::battle::position::Position;
use crate::battle::units::Unit;
use crate::core::types::UnitId;

/// How attractive `target` is for `shooter` to go after
pub fn score_target(shooter: &Unit, target: &Unit, grid: &Grid, personality: &AiPersonality) -> i32 {
    let weights = &personality.weights;
    let distance = shooter.position.distance(&target.position) as i32;

    let mut score = personality.threat.threat_of(target.archetype);

    if target.is_wounded() {
        score += weights.wounded_bonus;
    }

    score += (weights.proximity_base - weights.proximity_falloff * distance).max(0);

    let exposed = grid
        .kind_at(target.position)
        .map(|k| !k.provides_cover())
        .unwrap_or(true);
    if exposed {
        score += weights.exposed_bonus;
    }

    score
}

/// Score every enemy and order them best first, keeping input order among equals
pub fn rank_targets(
    shooter: &Unit,
    enemies: &[&Unit],
    grid: &Grid,
    personality: &AiPersonality,
) -> Vec<(UnitId, i32)> {
    let mut ranked: Vec<(UnitId, i32)> = enemies
        .iter()
        .map(|enemy| (enemy.id, score_target(shooter, enemy, grid, personality)))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// How good `pos` would be for `unit` while going after `target`
pub fn score_position(
    unit: &Unit,
    pos: Position,
    target: &Unit,
    enemies: &[&Unit],
    grid: &Grid,
    personality: &AiPersonality,
) -> i32 {
    let weights = &personality.weights;
    let distance = pos.distance(&target.position) as i32;

    let mut score = if unit.archetype.prefers_standoff() {
        let ideal = (unit.stats().range / 2) as i32;
        -(distance - ideal).abs() * weights.standoff_penalty
    } else {
        -distance * weights.approach_penalty
    };

    if grid.kind_at(pos).map(|k| k.provides_cover()).unwrap_or(false) {
        score += weights.cover_bonus;
    }

    if unit.covers_from(pos, target.position, grid) {
        score += weights.firing_position_bonus;
    }

    let crowding = enemies
        .iter()
        .filter(|e| pos.distance(&e.position) <= weights.crowding_radius)
        .count() as i32;
    score -= crowding * weights.crowding_penalty;

    score
}

/// Best passable tile within one move of `unit`, first found on ties
pub fn best_position(
    unit: &Unit,
    target: &Unit,
    enemies: &[&Unit],
    grid: &Grid,
    personality: &AiPersonality,
) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;

    for pos in unit.position.within(unit.stats().move_range) {
        if !grid.is_passable(pos) {
            continue;
        }
        let score = score_position(unit, pos, target, enemies, grid, personality);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((pos, score)),
        }
    }

    best.map(|(pos, _)| pos)
}

/// Passable neighbour (diagonals included) closest to `goal`, first found on ties
pub fn greedy_step(unit: &Unit, goal: Position, grid: &Grid) -> Option<Position> {
    let mut best: Option<(Position, u32)> = None;

    for pos in unit.position.neighbors() {
        if !grid.is_passable(pos) {
            continue;
        }
        let distance = pos.distance(&goal);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((pos, distance)),
        }
    }

    best.map(|(pos, _)| pos)
}
