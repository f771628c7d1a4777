//! Enemy AI system for battle decision-making
//!
//! Architecture: heuristic scorer + data
//! - AiCommander plays a faction turn through the same commands a player uses
//! - AiPersonality holds TOML-loaded threat ranks and weights
//! - scoring keeps the target and tile math pure

mod commander;
mod personality;
mod scoring;

pub use commander::{AiCommander, AiTurnReport, Decision};
pub use personality::{load_personality, AiPersonality, ThreatConfig, WeightConfig};
pub use scoring::{best_position, greedy_step, rank_targets, score_position, score_target};
