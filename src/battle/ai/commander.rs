//! AI Commander - heuristic turn player
//!
//! Plays a whole faction turn in one go: every unit, in roster order, keeps deciding
//! until it is out of action points or has nothing useful left to do.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battle::ai::personality::AiPersonality;
use crate::battle::ai::scoring::{best_position, greedy_step, rank_targets};
use crate::battle::execution::BattleState;
use crate::battle::position::Position;
use crate::battle::unit_type::Faction;
use crate::battle::units::Unit;
use crate::core::types::UnitId;

/// What one decision step ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Attacked { target: UnitId },
    Moved { to: Position },
    /// Ends this unit's turn
    NoAction,
}

/// Tally of a finished AI turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTurnReport {
    pub attacks: u32,
    pub moves: u32,
    /// Units that stopped with action points left
    pub idle: u32,
}

/// AI Commander driven by an `AiPersonality`
#[derive(Debug, Clone, Default)]
pub struct AiCommander {
    personality: AiPersonality,
}

impl AiCommander {
    pub fn new(personality: AiPersonality) -> Self {
        Self { personality }
    }

    pub fn personality(&self) -> &AiPersonality {
        &self.personality
    }

    /// Play every live unit of `faction` until each is spent or stuck
    pub fn take_turn(&self, state: &mut BattleState, faction: Faction) -> AiTurnReport {
        let mut report = AiTurnReport::default();

        for id in state.roster().ids_of(faction) {
            loop {
                if state.is_finished() {
                    return report;
                }
                let ready = state.unit(id).map(|u| u.has_action_points());
                if ready != Some(true) {
                    break;
                }

                let decision = self.decide(state, id);
                debug!(unit = %id, ?decision, "AI decision");

                match decision {
                    Decision::Attacked { .. } => report.attacks += 1,
                    Decision::Moved { .. } => report.moves += 1,
                    Decision::NoAction => {
                        report.idle += 1;
                        break;
                    }
                }
            }
        }

        report
    }

    /// One decision step for a single unit: attack the top target, or reposition
    pub fn decide(&self, state: &mut BattleState, id: UnitId) -> Decision {
        let Some(unit) = state.unit(id).cloned() else {
            return Decision::NoAction;
        };

        let Some(target) = self.pick_target(state, &unit) else {
            return Decision::NoAction;
        };

        if unit.can_attack(target.position, state.grid()) {
            return match state.attack(id, target.id) {
                Ok(_) => Decision::Attacked { target: target.id },
                Err(_) => Decision::NoAction,
            };
        }

        let tactical = {
            let enemies: Vec<&Unit> = state.roster().of_faction(unit.faction.opponent()).collect();
            best_position(&unit, &target, &enemies, state.grid(), &self.personality)
                .filter(|pos| *pos != unit.position)
        };
        if let Some(pos) = tactical {
            if state.move_unit(id, pos).is_ok() {
                return Decision::Moved { to: pos };
            }
        }

        if let Some(pos) = greedy_step(&unit, target.position, state.grid()) {
            if state.move_unit(id, pos).is_ok() {
                return Decision::Moved { to: pos };
            }
        }

        Decision::NoAction
    }

    /// Highest scoring live enemy, roster order breaking ties
    fn pick_target(&self, state: &BattleState, unit: &Unit) -> Option<Unit> {
        let enemies: Vec<&Unit> = state.roster().of_faction(unit.faction.opponent()).collect();
        let ranked = rank_targets(unit, &enemies, state.grid(), &self.personality);
        let (target_id, _) = ranked.first()?;
        state.unit(*target_id).cloned()
    }
}
