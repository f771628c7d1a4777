//! Barricade - Entry Point
//!
//! Line-oriented terminal driver: the rioters are played from stdin, the police by the
//! AI. An optional first argument names a TOML battle config.

use barricade::battle::{Archetype, BattleState, Faction, Outcome, Position, Unit};
use barricade::core::config::{BattleConfig, Controller};
use barricade::core::error::Result;

use std::io::{self, Write};

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("barricade=warn")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => BattleConfig::load(&path)?,
        None => BattleConfig::default(),
    };

    tracing::info!(seed = config.seed, "Barricade starting...");

    let mut state = BattleState::new(config)?;

    println!("\n=== BARRICADE ===");
    println!("Rioters against police on a single street. Last side standing wins.");
    println!();
    print_help();

    // Main game loop
    loop {
        display_status(&state);

        if state.is_finished() {
            display_map(&state);
            announce(state.outcome());
            break;
        }

        // Prompt for input
        print!("> ");
        io::stdout().flush()?;

        // Read input
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        // Handle empty input
        if input.is_empty() {
            continue;
        }

        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "map" | "m" => display_map(&state),
            "status" | "s" => display_roster(&state),
            "select" => match parse_position(&args) {
                Some(pos) => match state.select_unit(pos) {
                    Ok(_) => display_selected(&state),
                    Err(e) => println!("Cannot select: {}", e),
                },
                None => println!("Usage: select <x> <y>"),
            },
            "move" => match parse_position(&args) {
                Some(pos) => match state.move_selected(pos) {
                    Ok(()) => display_selected(&state),
                    Err(e) => println!("Cannot move: {}", e),
                },
                None => println!("Usage: move <x> <y>"),
            },
            "attack" | "a" => match state.attack_nearest_in_range() {
                Ok(_) => print_latest(&state),
                Err(e) => println!("Cannot attack: {}", e),
            },
            "ability" | "f" => match state.use_selected_ability() {
                Ok(_) => print_latest(&state),
                Err(e) => println!("Cannot use ability: {}", e),
            },
            "end" | "e" => match end_turn(&mut state) {
                Ok(()) => display_log(&state),
                Err(e) => println!("Cannot end turn: {}", e),
            },
            _ => println!("Unknown command '{}'. Type 'help' for a list.", command),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// End the player's turn and, once the AI has played its reply, hand control back
fn end_turn(state: &mut BattleState) -> Result<()> {
    state.end_turn()?;

    let active = state.active_faction();
    let ai_reply = state.controller(active) == Controller::Ai
        && state.controller(active.opponent()) == Controller::Human;
    if ai_reply && !state.is_finished() {
        state.end_turn()?;
    }
    Ok(())
}

fn parse_position(args: &[&str]) -> Option<Position> {
    match args {
        [x, y] => Some(Position::new(x.parse().ok()?, y.parse().ok()?)),
        _ => None,
    }
}

fn print_help() {
    println!("Commands:");
    println!("  select <x> <y>  - Select one of your units");
    println!("  move <x> <y>    - Move the selected unit (1 AP)");
    println!("  attack / a      - Attack the nearest enemy in range (1 AP)");
    println!("  ability / f     - Use the selected unit's special ability (1 AP)");
    println!("  end / e         - End your turn");
    println!("  map / m         - Show the street");
    println!("  status / s      - List every unit");
    println!("  help / h        - Show this help");
    println!("  quit / q        - Exit the game");
    println!();
    println!("Your units:");
    for archetype in Archetype::ALL
        .iter()
        .filter(|a| a.faction() == Faction::Rioters)
    {
        println!("  {} {:<8} {}", glyph(*archetype), archetype.name(), archetype.help());
    }
    println!();
}

fn display_status(state: &BattleState) {
    println!(
        "--- Turn {} | {} to act | {} rioters, {} police ---",
        state.turn(),
        state.active_faction(),
        state.roster().of_faction(Faction::Rioters).count(),
        state.roster().of_faction(Faction::Police).count(),
    );
}

fn display_map(state: &BattleState) {
    let grid = state.grid();
    print!("   ");
    for x in 0..grid.width() {
        print!("{}", x % 10);
    }
    println!();

    for y in 0..grid.height() {
        print!("{:>2} ", y);
        for x in 0..grid.width() {
            let pos = Position::new(x, y);
            let ch = match state.unit_at(pos) {
                Some(unit) => glyph(unit.archetype),
                None => grid.kind_at(pos).map(|k| k.glyph()).unwrap_or(' '),
            };
            print!("{}", ch);
        }
        println!();
    }
    println!("Rioters are upper case, police lower case. x/X cover, ^ fire, ~ smoke.");
}

fn display_roster(state: &BattleState) {
    for unit in state.units() {
        print_unit(unit);
    }
}

fn display_selected(state: &BattleState) {
    if let Some(unit) = state.selected() {
        print!("Selected: ");
        print_unit(unit);
    }
}

fn print_unit(unit: &Unit) {
    println!(
        "  {} {:<13} {:<8} at {:<8} HP {:>3}/{:<3} AP {}/{}",
        glyph(unit.archetype),
        unit.name(),
        unit.faction.to_string(),
        unit.position.to_string(),
        unit.health(),
        unit.max_health(),
        unit.action_points(),
        unit.max_action_points(),
    );
}

fn print_latest(state: &BattleState) {
    if let Some(event) = state.combat_log().latest() {
        println!("{}", event.description);
    }
}

fn display_log(state: &BattleState) {
    println!("Combat log:");
    for event in state.combat_log().iter() {
        println!("  [{}] {}", event.turn, event.description);
    }
}

fn announce(outcome: Outcome) {
    match outcome {
        Outcome::Victory(Faction::Rioters) => println!("VICTORY! The street is yours."),
        Outcome::Victory(Faction::Police) => println!("DEFEAT. The police have cleared the street."),
        Outcome::DoubleElimination => println!("Nobody is left standing."),
        Outcome::InProgress => {}
    }
}

fn glyph(archetype: Archetype) -> char {
    match archetype {
        Archetype::Brawler => 'B',
        Archetype::Molotov => 'M',
        Archetype::Leader => 'L',
        Archetype::Medic => 'H',
        Archetype::Hacker => 'K',
        Archetype::ShieldBearer => 'S',
        Archetype::Officer => 'o',
        Archetype::RiotShield => 'r',
        Archetype::Sniper => 'n',
        Archetype::Teargas => 't',
        Archetype::DroneOperator => 'd',
    }
}
