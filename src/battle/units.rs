//! Unit instances and the roster that holds them
//!
//! A unit is an archetype plus the resources it spends during a match: health and
//! action points. The roster keeps deployment order, which is also the order the
//! AI walks its units in and breaks scoring ties by.

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::Grid;
use crate::battle::constants::ACTION_COST;
use crate::battle::position::Position;
use crate::battle::unit_type::{Archetype, ArchetypeStats, Faction};
use crate::core::types::UnitId;

/// A single combatant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub archetype: Archetype,
    pub faction: Faction,
    pub position: Position,
    health: u32,
    action_points: u32,
}

impl Unit {
    /// Fresh unit at full health and action points
    pub fn new(id: UnitId, archetype: Archetype, position: Position) -> Self {
        let stats = archetype.stats();
        Self {
            id,
            archetype,
            faction: archetype.faction(),
            position,
            health: stats.max_health,
            action_points: stats.max_action_points,
        }
    }

    pub fn stats(&self) -> ArchetypeStats {
        self.archetype.stats()
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.stats().max_health
    }

    pub fn action_points(&self) -> u32 {
        self.action_points
    }

    pub fn max_action_points(&self) -> u32 {
        self.stats().max_action_points
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Below half health?
    pub fn is_wounded(&self) -> bool {
        self.health * 2 < self.max_health()
    }

    pub fn has_action_points(&self) -> bool {
        self.action_points >= ACTION_COST
    }

    /// Subtract damage, clamping at zero. Returns true if this hit was the killing blow.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }

    /// Restore health up to the maximum. Returns how much was actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health());
        self.health - before
    }

    pub fn reset_action_points(&mut self) {
        self.action_points = self.max_action_points();
    }

    /// Add action points up to the maximum. Returns how many were actually granted.
    pub fn grant_action_points(&mut self, amount: u32) -> u32 {
        let before = self.action_points;
        self.action_points = self
            .action_points
            .saturating_add(amount)
            .min(self.max_action_points());
        self.action_points - before
    }

    /// Pay for one action. Returns false (and spends nothing) when out of points.
    pub(crate) fn spend_action_point(&mut self) -> bool {
        if !self.has_action_points() {
            return false;
        }
        self.action_points -= ACTION_COST;
        true
    }

    /// Could this unit hit `target` from `from`, action points aside?
    pub fn covers_from(&self, from: Position, target: Position, grid: &Grid) -> bool {
        let distance = from.distance(&target);
        distance > 0 && distance <= self.stats().range && grid.has_line_of_sight(from, target)
    }

    /// Can this unit attack `target` right now?
    pub fn can_attack(&self, target: Position, grid: &Grid) -> bool {
        self.has_action_points() && self.covers_from(self.position, target, grid)
    }

    /// Is `target` within a single move of this unit (passability aside)?
    pub fn can_reach(&self, target: Position) -> bool {
        self.position.distance(&target) <= self.stats().move_range
    }

    pub fn name(&self) -> &'static str {
        self.archetype.name()
    }
}

/// All live units of both factions, in deployment order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    units: Vec<Unit>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit and hand back its id
    pub fn deploy(&mut self, archetype: Archetype, position: Position) -> UnitId {
        self.next_id += 1;
        let id = UnitId::new(self.next_id);
        self.units.push(Unit::new(id, archetype, position));
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn as_slice(&self) -> &[Unit] {
        &self.units
    }

    /// Live units of one faction, in deployment order
    pub fn of_faction(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.faction == faction && u.is_alive())
    }

    pub fn ids_of(&self, faction: Faction) -> Vec<UnitId> {
        self.of_faction(faction).map(|u| u.id).collect()
    }

    pub fn has_units(&self, faction: Faction) -> bool {
        self.of_faction(faction).next().is_some()
    }

    /// Take a unit out of the roster (order of the rest is kept)
    pub(crate) fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let index = self.units.iter().position(|u| u.id == id)?;
        Some(self.units.remove(index))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
