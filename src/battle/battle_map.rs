//! Battle map: a fixed rectangular street grid with cover and line of sight
//!
//! The grid owns every tile. Tiles only *index* their occupant; the unit's own
//! position is authoritative and the grid is updated alongside every move and removal.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{STREET_HEIGHT, STREET_WIDTH};
use crate::battle::position::Position;
use crate::battle::terrain::TileKind;
use crate::core::error::{BattleError, Result};
use crate::core::types::UnitId;

/// Barricades, cars and street furniture on the standard map
const STREET_COVER: [(i32, i32, TileKind); 7] = [
    (3, 3, TileKind::FullCover),   // Barricade
    (7, 5, TileKind::HalfCover),   // Café table
    (12, 8, TileKind::FullCover),  // Overturned car
    (15, 4, TileKind::HalfCover),  // Bus stop
    (5, 10, TileKind::FullCover),  // Metro entrance
    (10, 12, TileKind::HalfCover), // Fountain
    (8, 8, TileKind::HalfCover),   // Lamppost
];

/// A single tile on the battle map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    /// Cached occupancy index, never an owner
    pub occupant: Option<UnitId>,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            occupant: None,
        }
    }

    /// Walkable and nobody standing here
    pub fn is_passable(&self) -> bool {
        self.kind.is_walkable() && self.occupant.is_none()
    }
}

/// The full battle map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create an open grid (no walls, no cover)
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        }
    }

    /// The standard street: walled border plus fixed cover positions
    pub fn street() -> Self {
        let mut grid = Self::new(STREET_WIDTH, STREET_HEIGHT);

        for y in 0..grid.height {
            for x in 0..grid.width {
                if x == 0 || y == 0 || x == grid.width - 1 || y == grid.height - 1 {
                    grid.tiles[(y * grid.width + x) as usize] = Tile::new(TileKind::Wall);
                }
            }
        }

        for (x, y, kind) in STREET_COVER {
            grid.tiles[(y * grid.width + x) as usize] = Tile::new(kind);
        }

        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if self.in_bounds(pos) {
            Ok((pos.y * self.width + pos.x) as usize)
        } else {
            Err(BattleError::OutOfBounds(pos))
        }
    }

    /// Get the tile at a position
    pub fn tile_at(&self, pos: Position) -> Result<&Tile> {
        let index = self.index(pos)?;
        Ok(&self.tiles[index])
    }

    fn tile_at_mut(&mut self, pos: Position) -> Result<&mut Tile> {
        let index = self.index(pos)?;
        Ok(&mut self.tiles[index])
    }

    pub fn kind_at(&self, pos: Position) -> Result<TileKind> {
        self.tile_at(pos).map(|t| t.kind)
    }

    /// Can a unit move onto this position right now? Off-map is never passable.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.tile_at(pos).map(|t| t.is_passable()).unwrap_or(false)
    }

    /// Cover fraction of the tile at a position
    pub fn cover_factor(&self, pos: Position) -> Result<f32> {
        self.kind_at(pos).map(|k| k.cover_factor())
    }

    /// Cover in integer percent, used by the damage math
    pub fn cover_percent(&self, pos: Position) -> Result<u32> {
        self.kind_at(pos).map(|k| k.cover_percent())
    }

    /// Who is standing here, if anyone (off-map reads as nobody)
    pub fn occupant(&self, pos: Position) -> Option<UnitId> {
        self.tile_at(pos).ok().and_then(|t| t.occupant)
    }

    /// Change a tile's kind, keeping its occupant
    pub fn set_kind(&mut self, pos: Position, kind: TileKind) -> Result<()> {
        self.tile_at_mut(pos)?.kind = kind;
        Ok(())
    }

    /// Record `unit` as standing at `pos`. The tile must be passable.
    pub(crate) fn occupy(&mut self, pos: Position, unit: UnitId) -> Result<()> {
        let tile = self.tile_at_mut(pos)?;
        if !tile.is_passable() {
            return Err(BattleError::Blocked(pos));
        }
        tile.occupant = Some(unit);
        Ok(())
    }

    /// Clear the occupancy index at `pos`
    pub(crate) fn vacate(&mut self, pos: Position) {
        if let Ok(tile) = self.tile_at_mut(pos) {
            tile.occupant = None;
        }
    }

    /// Check line of sight between two cells
    ///
    /// Only walls block. Sampling the same cell twice is never a sighting.
    pub fn has_line_of_sight(&self, from: Position, to: Position) -> bool {
        if from == to {
            return false;
        }

        from.sight_line(&to).into_iter().all(|cell| {
            self.tile_at(cell)
                .map(|tile| !tile.kind.blocks_los())
                .unwrap_or(true)
        })
    }

    /// Every position on the map, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}
