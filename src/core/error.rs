use thiserror::Error;

use crate::battle::position::Position;
use crate::core::types::UnitId;

/// Everything the engine can refuse to do.
///
/// Command rejections never leave partial state behind: when one of these comes back
/// from a mutating call, nothing changed.
#[derive(Error, Debug)]
pub enum BattleError {
    #[error("Position out of bounds: {0}")]
    OutOfBounds(Position),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("The match is over")]
    MatchOver,

    #[error("Unit {0} does not belong to the active faction")]
    NotYourTurn(UnitId),

    #[error("This faction is not player-controlled")]
    NotControllable,

    #[error("No unit selected")]
    NoSelection,

    #[error("Unit {0} has no action points left")]
    NoActionPoints(UnitId),

    #[error("Target {target} is out of range for unit {unit}")]
    OutOfRange { unit: UnitId, target: Position },

    #[error("Destination {0} is not passable")]
    Blocked(Position),

    #[error("No line of sight from unit {unit} to {target}")]
    NoLineOfSight { unit: UnitId, target: Position },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Unit {0} has no special ability")]
    NoAbility(UnitId),

    #[error("No enemy in range")]
    NoTargetInRange,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl BattleError {
    /// Does this error describe a rejected player/AI command (as opposed to setup or IO)?
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            BattleError::Config(_) | BattleError::IoError(_) | BattleError::TomlError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
