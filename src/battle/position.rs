//! Square-grid coordinates for the street map
//!
//! Manhattan distance is the one distance metric used everywhere: weapon range,
//! movement allowance, ability radius and AI scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid coordinate (x grows right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance
    pub fn distance(&self, other: &Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Orthogonal neighbours in scan order: up, right, down, left
    pub fn orthogonal_neighbors(&self) -> [Position; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// The 8 surrounding cells, column by column (dx outer, dy inner)
    pub fn neighbors(&self) -> Vec<Position> {
        self.square(1).into_iter().filter(|p| p != self).collect()
    }

    /// Every cell of the (2r+1)x(2r+1) block centered here, self included.
    /// Scan order is dx outer, dy inner.
    pub fn square(&self, radius: i32) -> Vec<Position> {
        let mut results = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                results.push(self.offset(dx, dy));
            }
        }
        results
    }

    /// Every cell within Manhattan `range` (a diamond, self included).
    /// Scan order is dx outer, dy inner.
    pub fn within(&self, range: u32) -> Vec<Position> {
        let r = range as i32;
        let mut results = Vec::new();
        for dx in -r..=r {
            for dy in -r..=r {
                if dx.abs() + dy.abs() <= r {
                    results.push(self.offset(dx, dy));
                }
            }
        }
        results
    }

    /// Interior cells sampled on the straight line to `other` (endpoints excluded)
    ///
    /// Walks `max(|dx|, |dy|)` steps and floors each sample, so the sequence only depends
    /// on integers.
    pub fn sight_line(&self, other: &Self) -> Vec<Position> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let steps = dx.abs().max(dy.abs());
        if steps <= 1 {
            return Vec::new();
        }

        (1..steps)
            .map(|i| {
                Position::new(
                    self.x + (dx * i).div_euclid(steps),
                    self.y + (dy * i).div_euclid(steps),
                )
            })
            .collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
