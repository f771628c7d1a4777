//! Special abilities
//!
//! Every ability is centered on the caster and applied exactly once, at the moment it
//! is used: fire burns whoever stands on a freshly ignited tile and then just sits there
//! as walkable ground, smoke never fades on its own.
//!
//! Validation and the action point cost are the battle state's job; by the time
//! `resolve` runs the caster is known to be alive, active and paid up.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{BLAST_RADIUS, HEAL_RADIUS, INSPIRE_RADIUS};
use crate::battle::execution::BattleState;
use crate::battle::position::Position;
use crate::battle::terrain::TileKind;
use crate::battle::unit_type::{Ability, Faction};
use crate::battle::units::Unit;
use crate::core::types::UnitId;

/// What an ability actually did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityReport {
    pub caster: UnitId,
    pub ability: Ability,
    /// Tiles whose kind changed
    pub tiles_changed: Vec<Position>,
    /// Units that were burned, healed or inspired
    pub affected: Vec<UnitId>,
    /// Units removed as a result (the caster included, for a badly placed molotov)
    pub eliminated: Vec<UnitId>,
}

impl AbilityReport {
    fn new(caster: UnitId, ability: Ability) -> Self {
        Self {
            caster,
            ability,
            tiles_changed: Vec::new(),
            affected: Vec::new(),
            eliminated: Vec::new(),
        }
    }

    /// Short human-readable summary for the combat log
    pub fn summary(&self, caster_name: &str) -> String {
        match self.ability {
            Ability::Ignite => format!(
                "{} sets {} tiles ablaze, burning {} units",
                caster_name,
                self.tiles_changed.len(),
                self.affected.len()
            ),
            Ability::Heal => format!("{} heals {} allies", caster_name, self.affected.len()),
            Ability::Smoke => format!(
                "{} fills {} tiles with smoke",
                caster_name,
                self.tiles_changed.len()
            ),
            Ability::DeployCover => match self.tiles_changed.first() {
                Some(pos) => format!("{} deploys cover at {}", caster_name, pos),
                None => format!("{} finds no room to deploy cover", caster_name),
            },
            Ability::Inspire => {
                format!("{} inspires {} allies", caster_name, self.affected.len())
            }
        }
    }
}

/// Apply `ability` for `caster` against the battle
///
/// Dead units are taken off the board here and handed back for the caller to log.
pub(crate) fn resolve(
    state: &mut BattleState,
    caster: UnitId,
    ability: Ability,
) -> (AbilityReport, Vec<Unit>) {
    let mut report = AbilityReport::new(caster, ability);
    let mut removed = Vec::new();

    let Some((origin, faction)) = state.roster.get(caster).map(|u| (u.position, u.faction)) else {
        return (report, removed);
    };

    match ability {
        Ability::Ignite => ignite(state, origin, &mut report, &mut removed),
        Ability::Heal => {
            let amount = state.config.heal_amount;
            for id in allies_near(state, caster, faction, origin, HEAL_RADIUS) {
                if let Some(ally) = state.roster.get_mut(id) {
                    ally.heal(amount);
                    report.affected.push(id);
                }
            }
        }
        Ability::Smoke => {
            for pos in origin.square(BLAST_RADIUS) {
                if matches!(state.grid.kind_at(pos), Ok(TileKind::Empty))
                    && state.grid.set_kind(pos, TileKind::Smoke).is_ok()
                {
                    report.tiles_changed.push(pos);
                }
            }
        }
        Ability::DeployCover => {
            let spot = origin.orthogonal_neighbors().into_iter().find(|pos| {
                state
                    .grid
                    .tile_at(*pos)
                    .map(|t| t.kind == TileKind::Empty && t.occupant.is_none())
                    .unwrap_or(false)
            });
            if let Some(pos) = spot {
                if state.grid.set_kind(pos, TileKind::HalfCover).is_ok() {
                    report.tiles_changed.push(pos);
                }
            }
        }
        Ability::Inspire => {
            let bonus = state.config.inspire_bonus;
            for id in allies_near(state, caster, faction, origin, INSPIRE_RADIUS) {
                if let Some(ally) = state.roster.get_mut(id) {
                    ally.grant_action_points(bonus);
                    report.affected.push(id);
                }
            }
        }
    }

    (report, removed)
}

/// Burn the 3x3 block around `origin`, damaging anyone on a tile that catches
fn ignite(
    state: &mut BattleState,
    origin: Position,
    report: &mut AbilityReport,
    removed: &mut Vec<Unit>,
) {
    let damage = state.config.fire_damage;

    for pos in origin.square(BLAST_RADIUS) {
        let Ok(tile) = state.grid.tile_at(pos) else {
            continue;
        };
        if !tile.kind.is_flammable() {
            continue;
        }
        let occupant = tile.occupant;

        if state.grid.set_kind(pos, TileKind::Fire).is_err() {
            continue;
        }
        report.tiles_changed.push(pos);

        let Some(victim) = occupant else {
            continue;
        };
        let killed = state
            .roster
            .get_mut(victim)
            .map(|u| u.take_damage(damage))
            .unwrap_or(false);
        report.affected.push(victim);

        if killed {
            if let Some(unit) = state.remove_unit(victim) {
                removed.push(unit);
            }
            report.eliminated.push(victim);
        }
    }
}

/// Live allies of `faction` within `radius` of `origin`, the caster excluded
fn allies_near(
    state: &BattleState,
    caster: UnitId,
    faction: Faction,
    origin: Position,
    radius: u32,
) -> Vec<UnitId> {
    state
        .roster
        .of_faction(faction)
        .filter(|u| u.id != caster && u.position.distance(&origin) <= radius)
        .map(|u| u.id)
        .collect()
}
