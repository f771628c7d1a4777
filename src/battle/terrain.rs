//! Tile kinds and their movement, cover and sight contracts
//!
//! The street is mostly open pavement; walls frame it and a handful of barricades,
//! cars and café furniture break it up.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{FULL_COVER_PERCENT, HALF_COVER_PERCENT};

/// What a single street tile is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileKind {
    #[default]
    Empty,      // Open pavement
    Wall,       // Building front, impassable, blocks sight
    FullCover,  // Barricade, car wreck - impassable
    HalfCover,  // Café table, bus stop - can stand behind it
    Fire,       // Burning ground left by a molotov
    Smoke,      // Smoke screen
}

impl TileKind {
    /// Can a unit stand here (ignoring occupancy)?
    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            TileKind::Empty | TileKind::HalfCover | TileKind::Fire | TileKind::Smoke
        )
    }

    /// Percent of incoming damage absorbed by a unit on this tile
    pub fn cover_percent(&self) -> u32 {
        match self {
            TileKind::FullCover => FULL_COVER_PERCENT,
            TileKind::HalfCover => HALF_COVER_PERCENT,
            _ => 0,
        }
    }

    /// Cover as a fraction (0.0 = none, 0.5 = full cover)
    pub fn cover_factor(&self) -> f32 {
        self.cover_percent() as f32 / 100.0
    }

    pub fn provides_cover(&self) -> bool {
        self.cover_percent() > 0
    }

    /// Does this tile block line of sight?
    pub fn blocks_los(&self) -> bool {
        matches!(self, TileKind::Wall)
    }

    /// Can a molotov set this tile alight?
    pub fn is_flammable(&self) -> bool {
        matches!(self, TileKind::Empty | TileKind::HalfCover)
    }

    /// Single-character glyph for text displays
    pub fn glyph(&self) -> char {
        match self {
            TileKind::Empty => '.',
            TileKind::Wall => '#',
            TileKind::FullCover => 'X',
            TileKind::HalfCover => 'x',
            TileKind::Fire => '^',
            TileKind::Smoke => '~',
        }
    }
}
