//! Barricade - turn-based tactical street combat
//!
//! A rules engine for rioters against police on a fixed street grid, with a
//! heuristic AI for whichever side no player controls.

pub mod battle;
pub mod core;
