//! Core types, errors and configuration shared by the whole crate

pub mod config;
pub mod error;
pub mod types;

pub use config::{BattleConfig, Controller};
pub use error::{BattleError, Result};
pub use types::{TurnNumber, UnitId};
