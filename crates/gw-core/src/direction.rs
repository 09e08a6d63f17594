//! The eight compass directions an agent can face and step in.

use std::fmt;

use crate::{Cell, CoreError, CoreResult, Offset};

/// A compass direction, in clockwise order starting from north.
///
/// North is `+y`.  Diagonal steps move one cell on both axes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    N = 0,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// All directions in clockwise order.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Position in [`ALL`](Self::ALL); used to index per-direction tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit displacement for one step in this direction.
    #[inline]
    pub const fn offset(self) -> Offset {
        match self {
            Direction::N  => Offset::new(0, 1),
            Direction::NE => Offset::new(1, 1),
            Direction::E  => Offset::new(1, 0),
            Direction::SE => Offset::new(1, -1),
            Direction::S  => Offset::new(0, -1),
            Direction::SW => Offset::new(-1, -1),
            Direction::W  => Offset::new(-1, 0),
            Direction::NW => Offset::new(-1, 1),
        }
    }

    /// Direction of a unit displacement.  `None` for `(0, 0)` and for any
    /// component outside `-1..=1`.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (-1, -1) => Some(Direction::SW),
            (-1, 0)  => Some(Direction::W),
            (-1, 1)  => Some(Direction::NW),
            (0, -1)  => Some(Direction::S),
            (0, 1)   => Some(Direction::N),
            (1, -1)  => Some(Direction::SE),
            (1, 0)   => Some(Direction::E),
            (1, 1)   => Some(Direction::NE),
            _ => None,
        }
    }

    /// Direction of the single step from `from` to `to`.
    ///
    /// # Errors
    ///
    /// [`CoreError::NotAdjacent`] when the cells are identical or more than
    /// one king move apart.
    pub fn between(from: Cell, to: Cell) -> CoreResult<Direction> {
        Self::from_delta(to.x - from.x, to.y - from.y)
            .ok_or(CoreError::NotAdjacent { from, to })
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 4) % 8]
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::N  => "N",
            Direction::NE => "NE",
            Direction::E  => "E",
            Direction::SE => "SE",
            Direction::S  => "S",
            Direction::SW => "SW",
            Direction::W  => "W",
            Direction::NW => "NW",
        };
        f.write_str(s)
    }
}
