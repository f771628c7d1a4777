//! Property-based tests for combat resolution and battle invariants.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use barricade::battle::*;
use barricade::core::config::{BattleConfig, Controller};
use barricade::core::types::UnitId;

/// A command a player could issue, with raw coordinates and ids
#[derive(Debug, Clone)]
enum Command {
    Move { unit: u32, x: i32, y: i32 },
    Attack { attacker: u32, target: u32 },
    Ability { unit: u32 },
    EndTurn,
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => (1u32..=10, -1i32..=20, -1i32..=15).prop_map(|(unit, x, y)| Command::Move { unit, x, y }),
        3 => (1u32..=10, 1u32..=10).prop_map(|(attacker, target)| Command::Attack { attacker, target }),
        2 => (1u32..=10).prop_map(|unit| Command::Ability { unit }),
        1 => Just(Command::EndTurn),
    ]
}

fn hot_seat(seed: u64) -> BattleConfig {
    BattleConfig {
        seed,
        police: Controller::Human,
        ..BattleConfig::default()
    }
}

fn apply(state: &mut BattleState, command: &Command) -> bool {
    match *command {
        Command::Move { unit, x, y } => state.move_unit(UnitId(unit), Position::new(x, y)).is_ok(),
        Command::Attack { attacker, target } => {
            state.attack(UnitId(attacker), UnitId(target)).is_ok()
        }
        Command::Ability { unit } => state.use_ability(UnitId(unit)).is_ok(),
        Command::EndTurn => state.end_turn().is_ok(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Dealt damage always lands inside the variance band of the mitigated value.
    #[test]
    fn prop_damage_within_band(
        base in 0u32..=200,
        cover in prop_oneof![Just(0u32), Just(25u32), Just(50u32)],
        seed in any::<u64>()
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let roll = resolve_damage(base, cover, 20, &mut rng);

        let mitigated = base * (100 - cover) / 100;
        prop_assert_eq!(roll.mitigated, mitigated);
        prop_assert!(roll.dealt >= mitigated * 80 / 100);
        prop_assert!(roll.dealt <= mitigated * 120 / 100);
    }

    /// Cover never makes a hit stronger.
    #[test]
    fn prop_cover_only_reduces(base in 0u32..=200) {
        prop_assert!(mitigate(base, 50) <= mitigate(base, 25));
        prop_assert!(mitigate(base, 25) <= mitigate(base, 0));
        prop_assert_eq!(mitigate(base, 0), base);
    }

    /// Health stays in bounds, the dead leave the map and the grid index matches the roster.
    #[test]
    fn prop_commands_keep_battle_consistent(
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 1..80)
    ) {
        let mut state = BattleState::new(hot_seat(seed)).unwrap();

        for command in &commands {
            apply(&mut state, command);

            for unit in state.units() {
                prop_assert!(unit.is_alive());
                prop_assert!(unit.health() <= unit.max_health());
                prop_assert!(unit.action_points() <= unit.max_action_points());
                prop_assert_eq!(state.grid().occupant(unit.position), Some(unit.id));
            }
            let occupied = state
                .grid()
                .positions()
                .filter(|pos| state.grid().occupant(*pos).is_some())
                .count();
            prop_assert_eq!(occupied, state.units().len());

            if let Outcome::Victory(winner) = state.outcome() {
                prop_assert!(!state.roster().has_units(winner.opponent()));
            }
        }
    }

    /// A move lands exactly when it is in reach, onto a free tile, by an active unit with AP.
    #[test]
    fn prop_move_applied_iff_legal(
        unit in 1u32..=10,
        x in -1i32..=20,
        y in -1i32..=15,
        end_first in any::<bool>()
    ) {
        let mut state = BattleState::new(hot_seat(1)).unwrap();
        if end_first {
            state.end_turn().unwrap();
        }
        let id = UnitId(unit);
        let target = Position::new(x, y);
        let before = state.unit(id).cloned().unwrap();

        let legal = before.faction == state.active_faction()
            && before.has_action_points()
            && before.can_reach(target)
            && state.grid().is_passable(target);

        let applied = state.move_unit(id, target).is_ok();
        prop_assert_eq!(applied, legal);

        let after = state.unit(id).unwrap();
        if applied {
            prop_assert_eq!(after.position, target);
            prop_assert_eq!(after.action_points(), before.action_points() - 1);
            prop_assert_eq!(state.grid().occupant(before.position), None);
        } else {
            prop_assert_eq!(after, &before);
            prop_assert_eq!(state.grid().occupant(before.position), Some(id));
        }
    }

    /// Ending a turn refills the side that just acted and leaves the other side alone.
    #[test]
    fn prop_end_turn_resets_only_finishing_side(
        moves in prop::collection::vec((1u32..=10, 0i32..20, 0i32..15), 0..12)
    ) {
        let mut state = BattleState::new(hot_seat(5)).unwrap();
        state.end_turn().unwrap();

        // Police spend some points, then hand over
        for (unit, x, y) in &moves {
            let _ = state.move_unit(UnitId(*unit), Position::new(*x, *y));
        }
        state.end_turn().unwrap();
        for (unit, x, y) in &moves {
            let _ = state.move_unit(UnitId(*unit), Position::new(*x, *y));
        }
        let police_before: Vec<u32> = state
            .roster()
            .of_faction(Faction::Police)
            .map(|u| u.action_points())
            .collect();

        state.end_turn().unwrap();

        for unit in state.roster().of_faction(Faction::Rioters) {
            prop_assert_eq!(unit.action_points(), unit.max_action_points());
        }
        let police_after: Vec<u32> = state
            .roster()
            .of_faction(Faction::Police)
            .map(|u| u.action_points())
            .collect();
        prop_assert_eq!(police_before, police_after);
    }
}
