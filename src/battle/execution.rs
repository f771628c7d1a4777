//! Battle execution: turn order, commands and win conditions
//!
//! `BattleState` is the one mutable aggregate of a match. Every command either applies
//! in full or is rejected with a `BattleError` and leaves the state untouched.
//!
//! Turn flow: rioters act, `end_turn`, police act, `end_turn`, next turn number.
//! When a faction becomes active and is AI-controlled, the AI plays it immediately.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::battle::abilities::{self, AbilityReport};
use crate::battle::ai::{AiCommander, AiPersonality, AiTurnReport};
use crate::battle::battle_map::Grid;
use crate::battle::position::Position;
use crate::battle::resolution::{resolve_attack, DamageRoll};
use crate::battle::unit_type::{Ability, Archetype, Faction};
use crate::battle::units::{Roster, Unit};
use crate::core::config::{BattleConfig, Controller};
use crate::core::error::{BattleError, Result};
use crate::core::types::{TurnNumber, UnitId};

/// Rioter line-up on the standard street, west end
pub const RIOTER_DEPLOYMENT: [(Archetype, Position); 5] = [
    (Archetype::Brawler, Position { x: 2, y: 2 }),
    (Archetype::Molotov, Position { x: 2, y: 4 }),
    (Archetype::Leader, Position { x: 4, y: 2 }),
    (Archetype::Medic, Position { x: 4, y: 4 }),
    (Archetype::Hacker, Position { x: 6, y: 3 }),
];

/// Police line-up on the standard street, east end
pub const POLICE_DEPLOYMENT: [(Archetype, Position); 5] = [
    (Archetype::Officer, Position { x: 16, y: 10 }),
    (Archetype::Officer, Position { x: 16, y: 12 }),
    (Archetype::RiotShield, Position { x: 14, y: 11 }),
    (Archetype::Sniper, Position { x: 18, y: 11 }),
    (Archetype::Teargas, Position { x: 17, y: 9 }),
];

/// Match outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Victory(Faction),
    /// Both sides wiped out at once
    DoubleElimination,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub turn: TurnNumber,
    pub event_type: CombatEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEventType {
    Attack {
        attacker: UnitId,
        target: UnitId,
        damage: u32,
    },
    UnitEliminated {
        unit: UnitId,
    },
    AbilityUsed {
        unit: UnitId,
        ability: Ability,
    },
    TurnEnded {
        faction: Faction,
    },
    MatchEnded {
        outcome: Outcome,
    },
}

/// Bounded combat log, oldest entry dropped first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLog {
    entries: VecDeque<CombatEvent>,
    capacity: usize,
}

impl CombatLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, event: CombatEvent) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&CombatEvent> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.description.clone()).collect()
    }
}

/// Result of a resolved attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    pub attacker: UnitId,
    pub target: UnitId,
    pub roll: DamageRoll,
    pub eliminated: bool,
}

/// Serializable view of a match for presenters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub turn: TurnNumber,
    pub active_faction: Faction,
    pub outcome: Outcome,
    pub selected: Option<UnitId>,
    pub grid: Grid,
    pub units: Vec<Unit>,
    pub combat_log: Vec<String>,
}

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct BattleState {
    pub(crate) grid: Grid,
    pub(crate) roster: Roster,
    active: Faction,
    turn: TurnNumber,
    selected: Option<UnitId>,
    combat_log: CombatLog,
    outcome: Outcome,
    pub(crate) config: BattleConfig,
    rng: ChaCha8Rng,
    ai: AiCommander,
}

impl BattleState {
    /// Standard street battle with the default AI personality
    pub fn new(config: BattleConfig) -> Result<Self> {
        Self::with_personality(config, AiPersonality::default())
    }

    /// Standard street battle with a chosen AI personality
    pub fn with_personality(config: BattleConfig, personality: AiPersonality) -> Result<Self> {
        let deployments: Vec<(Archetype, Position)> = RIOTER_DEPLOYMENT
            .iter()
            .chain(POLICE_DEPLOYMENT.iter())
            .copied()
            .collect();
        Self::build(Grid::street(), &deployments, config, personality)
    }

    /// Custom map and line-up, deployed in the order given
    pub fn from_layout(
        grid: Grid,
        deployments: &[(Archetype, Position)],
        config: BattleConfig,
    ) -> Result<Self> {
        Self::build(grid, deployments, config, AiPersonality::default())
    }

    fn build(
        mut grid: Grid,
        deployments: &[(Archetype, Position)],
        config: BattleConfig,
        personality: AiPersonality,
    ) -> Result<Self> {
        config.validate()?;

        let mut roster = Roster::new();
        for &(archetype, pos) in deployments {
            let id = roster.deploy(archetype, pos);
            grid.occupy(pos, id)?;
        }

        info!(
            seed = config.seed,
            units = roster.len(),
            personality = %personality.name,
            "Battle created"
        );

        let mut state = Self {
            grid,
            roster,
            active: Faction::Rioters,
            turn: 1,
            selected: None,
            combat_log: CombatLog::new(config.combat_log_capacity),
            outcome: Outcome::InProgress,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            ai: AiCommander::new(personality),
        };

        state.check_outcome();
        state.begin_turn();
        Ok(state)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Live units, both factions, in deployment order
    pub fn units(&self) -> &[Unit] {
        self.roster.as_slice()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.roster.get(id)
    }

    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.grid.occupant(pos).and_then(|id| self.roster.get(id))
    }

    pub fn active_faction(&self) -> Faction {
        self.active
    }

    pub fn turn(&self) -> TurnNumber {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_over()
    }

    pub fn combat_log(&self) -> &CombatLog {
        &self.combat_log
    }

    pub fn selected(&self) -> Option<&Unit> {
        self.selected.and_then(|id| self.roster.get(id))
    }

    pub fn controller(&self, faction: Faction) -> Controller {
        self.config.controller(faction)
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn personality(&self) -> &AiPersonality {
        self.ai.personality()
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            turn: self.turn,
            active_faction: self.active,
            outcome: self.outcome,
            selected: self.selected,
            grid: self.grid.clone(),
            units: self.roster.as_slice().to_vec(),
            combat_log: self.combat_log.descriptions(),
        }
    }

    // ------------------------------------------------------------------
    // Selection-based commands (interactive faction)
    // ------------------------------------------------------------------

    /// Select the active faction's unit standing at `pos`
    pub fn select_unit(&mut self, pos: Position) -> Result<UnitId> {
        let result = self.try_select(pos);
        if let Ok(id) = result {
            self.selected = Some(id);
        }
        rejected_at_debug(result)
    }

    fn try_select(&self, pos: Position) -> Result<UnitId> {
        self.ensure_in_progress()?;
        let tile = self.grid.tile_at(pos)?;
        let id = tile
            .occupant
            .ok_or_else(|| BattleError::InvalidTarget(format!("no unit at {}", pos)))?;
        let unit = self.roster.get(id).ok_or(BattleError::UnitNotFound(id))?;
        if unit.faction != self.active {
            return Err(BattleError::NotYourTurn(id));
        }
        if self.controller(self.active) != Controller::Human {
            return Err(BattleError::NotControllable);
        }
        Ok(id)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn move_selected(&mut self, target: Position) -> Result<()> {
        let id = rejected_at_debug(self.selected.ok_or(BattleError::NoSelection))?;
        self.move_unit(id, target)
    }

    /// Attack the closest enemy the selected unit can legally hit
    pub fn attack_nearest_in_range(&mut self) -> Result<AttackReport> {
        let target = rejected_at_debug(self.nearest_target())?;
        let attacker = self.selected.ok_or(BattleError::NoSelection)?;
        self.attack(attacker, target)
    }

    fn nearest_target(&self) -> Result<UnitId> {
        let id = self.selected.ok_or(BattleError::NoSelection)?;
        let unit = self.actor(id)?;
        self.roster
            .of_faction(unit.faction.opponent())
            .filter(|enemy| unit.can_attack(enemy.position, &self.grid))
            .min_by_key(|enemy| unit.position.distance(&enemy.position))
            .map(|enemy| enemy.id)
            .ok_or(BattleError::NoTargetInRange)
    }

    pub fn use_selected_ability(&mut self) -> Result<AbilityReport> {
        let id = rejected_at_debug(self.selected.ok_or(BattleError::NoSelection))?;
        self.use_ability(id)
    }

    // ------------------------------------------------------------------
    // Unit-level commands
    // ------------------------------------------------------------------

    /// Move a unit of the active faction up to its move range onto a free tile
    pub fn move_unit(&mut self, id: UnitId, target: Position) -> Result<()> {
        rejected_at_debug(self.validate_move(id, target))?;

        let from = match self.roster.get(id) {
            Some(unit) => unit.position,
            None => return Err(BattleError::UnitNotFound(id)),
        };
        // Occupy first: a refusal here leaves the old tile untouched
        self.grid.occupy(target, id)?;
        self.grid.vacate(from);

        if let Some(unit) = self.roster.get_mut(id) {
            unit.position = target;
            unit.spend_action_point();
        }

        debug!(unit = %id, %from, to = %target, "Unit moved");
        Ok(())
    }

    fn validate_move(&self, id: UnitId, target: Position) -> Result<()> {
        let unit = self.actor(id)?;
        self.grid.tile_at(target)?;
        if !unit.can_reach(target) {
            return Err(BattleError::OutOfRange { unit: id, target });
        }
        if !self.grid.is_passable(target) {
            return Err(BattleError::Blocked(target));
        }
        Ok(())
    }

    /// Attack an enemy unit with a unit of the active faction
    pub fn attack(&mut self, attacker_id: UnitId, target_id: UnitId) -> Result<AttackReport> {
        let (attacker, target) = rejected_at_debug(self.validate_attack(attacker_id, target_id))?;

        let roll = resolve_attack(
            &attacker,
            &target,
            &self.grid,
            self.config.damage_variance_percent,
            &mut self.rng,
        );

        if let Some(unit) = self.roster.get_mut(attacker_id) {
            unit.spend_action_point();
        }
        let eliminated = self
            .roster
            .get_mut(target_id)
            .map(|u| u.take_damage(roll.dealt))
            .unwrap_or(false);

        let cover_text = if roll.cover_percent > 0 {
            format!(" (through {}% cover)", roll.cover_percent)
        } else {
            String::new()
        };
        self.log_event(
            CombatEventType::Attack {
                attacker: attacker_id,
                target: target_id,
                damage: roll.dealt,
            },
            format!(
                "{} deals {} damage to {}{}",
                attacker.name(),
                roll.dealt,
                target.name(),
                cover_text
            ),
        );

        if eliminated {
            self.eliminate(target_id);
            self.check_outcome();
        }

        Ok(AttackReport {
            attacker: attacker_id,
            target: target_id,
            roll,
            eliminated,
        })
    }

    fn validate_attack(&self, attacker_id: UnitId, target_id: UnitId) -> Result<(Unit, Unit)> {
        let attacker = self.actor(attacker_id)?;
        let target = self
            .roster
            .get(target_id)
            .filter(|t| t.is_alive())
            .ok_or(BattleError::UnitNotFound(target_id))?;

        if target.faction == attacker.faction {
            return Err(BattleError::InvalidTarget(format!(
                "{} {} is on the same side",
                target.name(),
                target_id
            )));
        }

        let distance = attacker.position.distance(&target.position);
        if distance == 0 || distance > attacker.stats().range {
            return Err(BattleError::OutOfRange {
                unit: attacker_id,
                target: target.position,
            });
        }
        if !self.grid.has_line_of_sight(attacker.position, target.position) {
            return Err(BattleError::NoLineOfSight {
                unit: attacker_id,
                target: target.position,
            });
        }

        Ok((attacker.clone(), target.clone()))
    }

    /// Use the unit's special ability
    pub fn use_ability(&mut self, id: UnitId) -> Result<AbilityReport> {
        let (ability, name) = rejected_at_debug(self.validate_ability(id))?;

        if let Some(unit) = self.roster.get_mut(id) {
            unit.spend_action_point();
        }
        let (report, removed) = abilities::resolve(self, id, ability);

        self.log_event(
            CombatEventType::AbilityUsed { unit: id, ability },
            report.summary(name),
        );
        for unit in &removed {
            self.log_elimination(unit);
        }

        if !removed.is_empty() {
            self.check_outcome();
        }
        Ok(report)
    }

    fn validate_ability(&self, id: UnitId) -> Result<(Ability, &'static str)> {
        let unit = self.actor(id)?;
        let ability = unit.archetype.ability().ok_or(BattleError::NoAbility(id))?;
        Ok((ability, unit.name()))
    }

    /// Finish the active faction's turn and hand over to the other side
    pub fn end_turn(&mut self) -> Result<()> {
        rejected_at_debug(self.ensure_in_progress())?;

        let finished = self.active;
        for id in self.roster.ids_of(finished) {
            if let Some(unit) = self.roster.get_mut(id) {
                unit.reset_action_points();
            }
        }
        self.log_event(
            CombatEventType::TurnEnded { faction: finished },
            format!("{} end their turn", finished),
        );

        self.active = finished.opponent();
        if self.active == Faction::Rioters {
            self.turn += 1;
        }
        self.selected = None;
        info!(turn = self.turn, faction = %self.active, "Turn started");

        self.begin_turn();
        self.check_outcome();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Let the AI play the active faction if it owns it
    fn begin_turn(&mut self) {
        if self.is_finished() || self.controller(self.active) != Controller::Ai {
            return;
        }
        let faction = self.active;
        let ai = self.ai.clone();
        let report: AiTurnReport = ai.take_turn(self, faction);
        info!(
            faction = %faction,
            attacks = report.attacks,
            moves = report.moves,
            "AI turn finished"
        );
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.is_finished() {
            Err(BattleError::MatchOver)
        } else {
            Ok(())
        }
    }

    /// A unit allowed to act right now
    fn actor(&self, id: UnitId) -> Result<&Unit> {
        self.ensure_in_progress()?;
        let unit = self
            .roster
            .get(id)
            .filter(|u| u.is_alive())
            .ok_or(BattleError::UnitNotFound(id))?;
        if unit.faction != self.active {
            return Err(BattleError::NotYourTurn(id));
        }
        if !unit.has_action_points() {
            return Err(BattleError::NoActionPoints(id));
        }
        Ok(unit)
    }

    /// Take a unit off the roster, the grid and the selection without logging
    pub(crate) fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.roster.remove(id)?;
        self.grid.vacate(unit.position);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(unit)
    }

    /// Remove a dead unit and log it
    fn eliminate(&mut self, id: UnitId) {
        if let Some(unit) = self.remove_unit(id) {
            self.log_elimination(&unit);
        }
    }

    fn log_elimination(&mut self, unit: &Unit) {
        self.log_event(
            CombatEventType::UnitEliminated { unit: unit.id },
            format!("{} is eliminated!", unit.name()),
        );
    }

    /// Settle the outcome once a side has nobody left
    fn check_outcome(&mut self) {
        if self.is_finished() {
            return;
        }

        let rioters = self.roster.has_units(Faction::Rioters);
        let police = self.roster.has_units(Faction::Police);
        let outcome = match (rioters, police) {
            (true, true) => return,
            (true, false) => Outcome::Victory(Faction::Rioters),
            (false, true) => Outcome::Victory(Faction::Police),
            (false, false) => {
                warn!(turn = self.turn, "Both factions eliminated");
                Outcome::DoubleElimination
            }
        };

        self.outcome = outcome;
        self.selected = None;
        let description = match outcome {
            Outcome::Victory(faction) => format!("{} win the battle!", faction),
            _ => "Nobody is left standing".to_string(),
        };
        self.log_event(CombatEventType::MatchEnded { outcome }, description);
    }

    fn log_event(&mut self, event_type: CombatEventType, description: String) {
        info!(turn = self.turn, "{}", description);
        self.combat_log.push(CombatEvent {
            turn: self.turn,
            event_type,
            description,
        });
    }
}

/// Log a refused command at debug level and pass the result through
fn rejected_at_debug<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        debug!(%err, "Command rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::terrain::TileKind;

    fn hot_seat() -> BattleConfig {
        BattleConfig {
            police: Controller::Human,
            damage_variance_percent: 0,
            ..BattleConfig::default()
        }
    }

    fn duel(a: (Archetype, Position), b: (Archetype, Position)) -> BattleState {
        BattleState::from_layout(Grid::new(20, 15), &[a, b], hot_seat()).expect("duel deploys")
    }

    #[test]
    fn test_standard_battle_setup() {
        let state = BattleState::new(hot_seat()).unwrap();
        assert_eq!(state.units().len(), 10);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.active_faction(), Faction::Rioters);
        assert_eq!(state.outcome(), Outcome::InProgress);
        assert_eq!(state.unit_at(Position::new(2, 4)).unwrap().archetype, Archetype::Molotov);
        assert_eq!(state.unit_at(Position::new(18, 11)).unwrap().archetype, Archetype::Sniper);
    }

    #[test]
    fn test_deploying_onto_wall_fails() {
        let result = BattleState::from_layout(
            Grid::street(),
            &[(Archetype::Brawler, Position::new(0, 0))],
            hot_seat(),
        );
        assert!(matches!(result, Err(BattleError::Blocked(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BattleConfig {
            combat_log_capacity: 0,
            ..hot_seat()
        };
        assert!(matches!(BattleState::new(config), Err(BattleError::Config(_))));
    }

    #[test]
    fn test_move_updates_grid_and_ap() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        let id = UnitId(1);

        state.move_unit(id, Position::new(5, 3)).unwrap();

        let unit = state.unit(id).unwrap();
        assert_eq!(unit.position, Position::new(5, 3));
        assert_eq!(unit.action_points(), 1);
        assert_eq!(state.grid().occupant(Position::new(5, 3)), Some(id));
        assert_eq!(state.grid().occupant(Position::new(2, 2)), None);
    }

    #[test]
    fn test_move_out_of_range_rejected() {
        let mut state = duel(
            (Archetype::Medic, Position::new(2, 2)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        let result = state.move_unit(UnitId(1), Position::new(5, 3));
        assert!(matches!(result, Err(BattleError::OutOfRange { .. })));
        assert_eq!(state.unit(UnitId(1)).unwrap().action_points(), 2);
    }

    #[test]
    fn test_move_onto_occupied_rejected() {
        let mut state = duel(
            (Archetype::Medic, Position::new(2, 2)),
            (Archetype::Officer, Position::new(3, 2)),
        );
        let result = state.move_unit(UnitId(1), Position::new(3, 2));
        assert!(matches!(result, Err(BattleError::Blocked(_))));
    }

    #[test]
    fn test_move_off_map_rejected() {
        let mut state = duel(
            (Archetype::Medic, Position::new(0, 0)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        let result = state.move_unit(UnitId(1), Position::new(-1, 0));
        assert!(matches!(result, Err(BattleError::OutOfBounds(_))));
    }

    #[test]
    fn test_police_cannot_act_on_rioter_turn() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        let result = state.move_unit(UnitId(2), Position::new(14, 10));
        assert!(matches!(result, Err(BattleError::NotYourTurn(_))));
    }

    #[test]
    fn test_attack_logs_cover() {
        let mut grid = Grid::new(20, 15);
        grid.set_kind(Position::new(3, 2), TileKind::HalfCover).unwrap();
        let mut state = BattleState::from_layout(
            grid,
            &[
                (Archetype::Brawler, Position::new(2, 2)),
                (Archetype::Officer, Position::new(3, 2)),
            ],
            hot_seat(),
        )
        .unwrap();

        let report = state.attack(UnitId(1), UnitId(2)).unwrap();

        assert_eq!(report.roll.dealt, 33);
        assert_eq!(state.unit(UnitId(2)).unwrap().health(), 67);
        assert_eq!(
            state.combat_log().latest().unwrap().description,
            "Brawler deals 33 damage to Officer (through 25% cover)"
        );
    }

    #[test]
    fn test_attack_out_of_range_rejected() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(4, 2)),
        );
        let result = state.attack(UnitId(1), UnitId(2));
        assert!(matches!(result, Err(BattleError::OutOfRange { .. })));
        assert!(state.combat_log().is_empty());
    }

    #[test]
    fn test_attack_through_wall_rejected() {
        let mut grid = Grid::new(20, 15);
        grid.set_kind(Position::new(4, 2), TileKind::Wall).unwrap();
        let mut state = BattleState::from_layout(
            grid,
            &[
                (Archetype::Molotov, Position::new(2, 2)),
                (Archetype::Officer, Position::new(6, 2)),
            ],
            hot_seat(),
        )
        .unwrap();
        let result = state.attack(UnitId(1), UnitId(2));
        assert!(matches!(result, Err(BattleError::NoLineOfSight { .. })));
    }

    #[test]
    fn test_friendly_fire_rejected() {
        let mut state = BattleState::from_layout(
            Grid::new(20, 15),
            &[
                (Archetype::Brawler, Position::new(2, 2)),
                (Archetype::Medic, Position::new(3, 2)),
                (Archetype::Officer, Position::new(15, 10)),
            ],
            hot_seat(),
        )
        .unwrap();
        let result = state.attack(UnitId(1), UnitId(2));
        assert!(matches!(result, Err(BattleError::InvalidTarget(_))));
        assert_eq!(state.unit(UnitId(1)).unwrap().action_points(), 2);
    }

    #[test]
    fn test_kill_removes_unit_and_wins() {
        let mut state = duel(
            (Archetype::Molotov, Position::new(2, 2)),
            (Archetype::DroneOperator, Position::new(4, 2)),
        );
        // 60 damage against 60 health
        let report = state.attack(UnitId(1), UnitId(2)).unwrap();

        assert!(report.eliminated);
        assert!(state.unit(UnitId(2)).is_none());
        assert_eq!(state.grid().occupant(Position::new(4, 2)), None);
        assert_eq!(state.outcome(), Outcome::Victory(Faction::Rioters));
        assert!(matches!(state.end_turn(), Err(BattleError::MatchOver)));
        assert!(matches!(
            state.move_unit(UnitId(1), Position::new(3, 2)),
            Err(BattleError::MatchOver)
        ));
    }

    #[test]
    fn test_end_turn_flips_and_counts() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        state.move_unit(UnitId(1), Position::new(3, 2)).unwrap();

        state.end_turn().unwrap();
        assert_eq!(state.active_faction(), Faction::Police);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.unit(UnitId(1)).unwrap().action_points(), 2);

        state.end_turn().unwrap();
        assert_eq!(state.active_faction(), Faction::Rioters);
        assert_eq!(state.turn(), 2);
    }

    #[test]
    fn test_end_turn_leaves_other_faction_ap() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        state.end_turn().unwrap();
        state.move_unit(UnitId(2), Position::new(14, 10)).unwrap();
        state.end_turn().unwrap();
        // Police reset on their own end_turn, rioters untouched
        assert_eq!(state.unit(UnitId(2)).unwrap().action_points(), 2);

        state.move_unit(UnitId(1), Position::new(3, 2)).unwrap();
        state.end_turn().unwrap();
        state.move_unit(UnitId(2), Position::new(13, 10)).unwrap();
        assert_eq!(state.unit(UnitId(2)).unwrap().action_points(), 1);
        assert_eq!(state.unit(UnitId(1)).unwrap().action_points(), 2);
    }

    #[test]
    fn test_selection_commands() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(3, 2)),
        );

        assert!(matches!(state.attack_nearest_in_range(), Err(BattleError::NoSelection)));
        assert!(matches!(
            state.select_unit(Position::new(3, 2)),
            Err(BattleError::NotYourTurn(_))
        ));
        assert!(matches!(
            state.select_unit(Position::new(9, 9)),
            Err(BattleError::InvalidTarget(_))
        ));

        assert_eq!(state.select_unit(Position::new(2, 2)).unwrap(), UnitId(1));
        let report = state.attack_nearest_in_range().unwrap();
        assert_eq!(report.target, UnitId(2));
        assert_eq!(report.roll.dealt, 45);
    }

    #[test]
    fn test_select_ai_faction_not_controllable() {
        let config = BattleConfig {
            rioters: Controller::Ai,
            police: Controller::Human,
            ..hot_seat()
        };
        let mut state = BattleState::from_layout(
            Grid::new(20, 15),
            &[
                (Archetype::Brawler, Position::new(2, 2)),
                (Archetype::Officer, Position::new(18, 13)),
            ],
            config,
        )
        .unwrap();
        // The rioter AI already played; its faction stays active
        assert_eq!(state.active_faction(), Faction::Rioters);
        let brawler = state.units()[0].position;
        assert!(matches!(
            state.select_unit(brawler),
            Err(BattleError::NotControllable)
        ));
    }

    #[test]
    fn test_attack_nearest_without_target() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        state.select_unit(Position::new(2, 2)).unwrap();
        assert!(matches!(
            state.attack_nearest_in_range(),
            Err(BattleError::NoTargetInRange)
        ));
        assert_eq!(state.unit(UnitId(1)).unwrap().action_points(), 2);
    }

    #[test]
    fn test_attack_nearest_picks_closest() {
        let mut state = BattleState::from_layout(
            Grid::new(20, 15),
            &[
                (Archetype::Officer, Position::new(10, 10)),
                (Archetype::Brawler, Position::new(10, 7)),
                (Archetype::Leader, Position::new(6, 10)),
                (Archetype::Medic, Position::new(11, 9)),
            ],
            hot_seat(),
        )
        .unwrap();
        state.end_turn().unwrap();
        state.select_unit(Position::new(10, 10)).unwrap();

        let report = state.attack_nearest_in_range().unwrap();
        assert_eq!(report.target, UnitId(4));
    }

    #[test]
    fn test_ability_without_one_rejected() {
        let mut state = duel(
            (Archetype::Brawler, Position::new(2, 2)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        let result = state.use_ability(UnitId(1));
        assert!(matches!(result, Err(BattleError::NoAbility(_))));
        assert_eq!(state.unit(UnitId(1)).unwrap().action_points(), 2);
    }

    #[test]
    fn test_ability_costs_one_point() {
        let mut state = duel(
            (Archetype::Hacker, Position::new(5, 5)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        state.select_unit(Position::new(5, 5)).unwrap();

        let report = state.use_selected_ability().unwrap();

        assert_eq!(report.ability, Ability::Smoke);
        assert_eq!(state.unit(UnitId(1)).unwrap().action_points(), 1);
        assert_eq!(
            state.combat_log().latest().unwrap().description,
            "Hacker fills 9 tiles with smoke"
        );
    }

    #[test]
    fn test_molotov_self_elimination_clears_selection() {
        let mut state = duel(
            (Archetype::Molotov, Position::new(5, 5)),
            (Archetype::Officer, Position::new(15, 10)),
        );
        state.roster.get_mut(UnitId(1)).unwrap().take_damage(60);
        state.select_unit(Position::new(5, 5)).unwrap();

        let report = state.use_selected_ability().unwrap();

        assert_eq!(report.eliminated, vec![UnitId(1)]);
        assert!(state.selected().is_none());
        assert_eq!(state.outcome(), Outcome::Victory(Faction::Police));
    }

    fn mutual_ignite() -> BattleState {
        let mut state = duel(
            (Archetype::Molotov, Position::new(5, 5)),
            (Archetype::DroneOperator, Position::new(5, 6)),
        );
        state.roster.get_mut(UnitId(1)).unwrap().take_damage(60);
        state.roster.get_mut(UnitId(2)).unwrap().take_damage(45);
        state
    }

    #[test]
    fn test_simultaneous_wipeout_is_double_elimination() {
        let mut state = mutual_ignite();

        let report = state.use_ability(UnitId(1)).unwrap();

        assert_eq!(report.eliminated, vec![UnitId(1), UnitId(2)]);
        assert_eq!(state.outcome(), Outcome::DoubleElimination);
        assert!(state.is_finished());
        assert!(state.units().is_empty());

        assert!(matches!(state.end_turn(), Err(BattleError::MatchOver)));
        assert!(matches!(
            state.select_unit(Position::new(5, 5)),
            Err(BattleError::MatchOver)
        ));
        assert!(matches!(
            state.move_unit(UnitId(1), Position::new(6, 5)),
            Err(BattleError::MatchOver)
        ));
        assert!(matches!(
            state.attack(UnitId(1), UnitId(2)),
            Err(BattleError::MatchOver)
        ));
        assert!(matches!(state.use_ability(UnitId(1)), Err(BattleError::MatchOver)));
    }

    #[test]
    fn test_ability_logged_before_its_eliminations() {
        let mut state = mutual_ignite();

        state.use_ability(UnitId(1)).unwrap();

        assert_eq!(
            state.combat_log().descriptions(),
            vec![
                "Molotov sets 9 tiles ablaze, burning 2 units".to_string(),
                format!("{} is eliminated!", Archetype::Molotov.name()),
                format!("{} is eliminated!", Archetype::DroneOperator.name()),
                "Nobody is left standing".to_string(),
            ]
        );
    }

    #[test]
    fn test_combat_log_is_bounded() {
        let mut log = CombatLog::new(3);
        for turn in 1..=5 {
            log.push(CombatEvent {
                turn,
                event_type: CombatEventType::TurnEnded {
                    faction: Faction::Rioters,
                },
                description: format!("entry {}", turn),
            });
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.descriptions(), vec!["entry 3", "entry 4", "entry 5"]);
    }

    #[test]
    fn test_same_seed_same_battle() {
        let run = || {
            let mut state = BattleState::new(BattleConfig::ai_vs_ai(11)).unwrap();
            for _ in 0..6 {
                if state.end_turn().is_err() {
                    break;
                }
            }
            state.snapshot()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = BattleState::new(hot_seat()).unwrap();
        let json = serde_json::to_string(&state.snapshot()).expect("snapshot serializes");
        assert!(json.contains("\"active_faction\":\"Rioters\""));
    }
}
