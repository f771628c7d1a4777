//! Headless Battle Runner
//!
//! Runs AI vs AI street battles and prints the result as JSON or text.

use barricade::battle::ai::{load_personality, AiPersonality};
use barricade::battle::{BattleState, Faction, Outcome};
use barricade::core::config::BattleConfig;
use clap::Parser;
use serde::Serialize;

/// Headless Battle Runner - AI vs AI street battles
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run an AI vs AI street battle and print the outcome")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum turns before the battle is called a stalemate
    #[arg(long, default_value_t = 50)]
    max_turns: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// AI personality name (loaded from data/ai_personalities/) or path to a TOML file
    #[arg(long, default_value = "default")]
    personality: String,

    /// Print the combat log as the battle runs
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct BattleResult {
    outcome: String,
    winner: Option<Faction>,
    turns: u32,
    rioters_left: usize,
    police_left: usize,
    rioter_health: u32,
    police_health: u32,
    personality: String,
    seed: u64,
}

fn main() {
    let args = Args::parse();

    // --verbose streams every combat log entry through tracing
    let default_filter = if args.verbose { "barricade=info" } else { "barricade=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Determine seed
    let seed = args.seed.unwrap_or_else(rand::random);

    let personality = resolve_personality(&args.personality);

    let mut state = match BattleState::with_personality(BattleConfig::ai_vs_ai(seed), personality)
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to set up battle: {}", e);
            std::process::exit(1);
        }
    };

    // Run battle loop; every end_turn lets the AI play the side that comes up
    while !state.is_finished() && state.turn() <= args.max_turns {
        if let Err(e) = state.end_turn() {
            eprintln!("Battle stopped: {}", e);
            break;
        }
    }

    if args.verbose {
        eprintln!("=== Final combat log ===");
        for event in state.combat_log().iter() {
            eprintln!("  [{}] {}", event.turn, event.description);
        }
    }

    let result = summarize(&state, seed);

    match args.format.as_str() {
        "text" => print_text(&result),
        "json" => print_json(&result),
        _ => {
            eprintln!("Unknown format '{}', defaulting to json", args.format);
            print_json(&result);
        }
    }
}

/// A bare name is looked up in data/ai_personalities, anything ending in .toml is a path
fn resolve_personality(arg: &str) -> AiPersonality {
    let loaded = if arg.ends_with(".toml") {
        AiPersonality::load(arg)
    } else {
        load_personality(arg)
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load personality '{}': {}", arg, e);
        eprintln!("Using default personality");
        AiPersonality::default()
    })
}

fn summarize(state: &BattleState, seed: u64) -> BattleResult {
    let roster = state.roster();
    let health = |faction: Faction| -> u32 { roster.of_faction(faction).map(|u| u.health()).sum() };

    let (outcome, winner) = match state.outcome() {
        Outcome::Victory(faction) => (format!("{} victory", faction), Some(faction)),
        Outcome::DoubleElimination => ("Double elimination".to_string(), None),
        Outcome::InProgress => ("Stalemate".to_string(), None),
    };

    BattleResult {
        outcome,
        winner,
        turns: state.turn(),
        rioters_left: roster.of_faction(Faction::Rioters).count(),
        police_left: roster.of_faction(Faction::Police).count(),
        rioter_health: health(Faction::Rioters),
        police_health: health(Faction::Police),
        personality: state.personality().name.clone(),
        seed,
    }
}

fn print_json(result: &BattleResult) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize result: {}", e),
    }
}

fn print_text(result: &BattleResult) {
    println!("Battle Result");
    println!("=============");
    println!("Outcome: {}", result.outcome);
    println!("Turns: {}", result.turns);
    println!(
        "Rioters left: {} ({} HP)",
        result.rioters_left, result.rioter_health
    );
    println!(
        "Police left: {} ({} HP)",
        result.police_left, result.police_health
    );
    println!();
    println!("Personality: {}", result.personality);
    println!("Seed: {}", result.seed);
}
