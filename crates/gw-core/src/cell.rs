//! Movement-grid coordinates.
//!
//! The movement grid is finer than the terrain grid: every terrain tile is
//! split into `SPACES_PER_TILE × SPACES_PER_TILE` movement cells.  All
//! occupancy and pathfinding happens at movement-cell resolution; terrain
//! weights are looked up at tile resolution via [`Cell::tile`].

use std::fmt;
use std::ops::{Add, Neg};

/// Movement cells per terrain tile along each axis.
pub const SPACES_PER_TILE: i32 = 3;

// ── Cell ──────────────────────────────────────────────────────────────────────

/// An integer coordinate in the movement grid.
///
/// Signed so that offsets and neighbor arithmetic can step off the map and be
/// rejected by [`GridBounds::contains`] instead of wrapping.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance between cell centres.
    #[inline]
    pub fn euclidean(self, other: Cell) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Sum of absolute axis differences.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Number of king moves between the cells.
    #[inline]
    pub fn chebyshev(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Terrain tile containing this cell.
    #[inline]
    pub fn tile(self) -> (i32, i32) {
        (self.x.div_euclid(SPACES_PER_TILE), self.y.div_euclid(SPACES_PER_TILE))
    }
}

impl Add<Offset> for Cell {
    type Output = Cell;
    #[inline]
    fn add(self, o: Offset) -> Cell {
        Cell::new(self.x + o.dx, self.y + o.dy)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Offset ────────────────────────────────────────────────────────────────────

/// A relative displacement, used by directions and footprints.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    #[inline]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, o: Offset) -> Offset {
        Offset::new(self.dx + o.dx, self.dy + o.dy)
    }
}

impl Neg for Offset {
    type Output = Offset;
    #[inline]
    fn neg(self) -> Offset {
        Offset::new(-self.dx, -self.dy)
    }
}

// ── GridBounds ────────────────────────────────────────────────────────────────

/// Width and height of a movement grid, with row-major cell indexing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub width:  u32,
    pub height: u32,
}

impl GridBounds {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bounds of the movement grid covering `tiles_w × tiles_h` terrain tiles.
    pub fn from_tiles(tiles_w: u32, tiles_h: u32) -> Self {
        let s = SPACES_PER_TILE as u32;
        Self::new(tiles_w * s, tiles_h * s)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Row-major index of `cell`, or `None` when it is off the grid.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        let w = self.width as usize;
        Cell::new((index % w) as i32, (index / w) as i32)
    }

    /// The up-to-eight in-bounds cells surrounding `cell`.
    ///
    /// Order is fixed: `x - 1 ..= x + 1` outer, `y - 1 ..= y + 1` inner, so
    /// searches that tie on cost expand neighbors reproducibly.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| Offset::new(dx, dy)))
            .filter(|o| *o != Offset::ZERO)
            .map(move |o| cell + o)
            .filter(move |c| self.contains(*c))
    }

    /// Every cell of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count()).map(move |i| self.cell_at(i))
    }
}

impl fmt::Display for GridBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
