//! Agent footprints: which cells an agent covers for each facing direction.
//!
//! # Shape classes
//!
//! | Variant            | Cells (relative to the anchor)                     |
//! |--------------------|----------------------------------------------------|
//! | `Single`           | `{(0,0)}` in every direction                       |
//! | `Pair`             | `{(0,0), -offset(facing)}`: the tail trails behind |
//! | `Square { radius }`| a `(2r+1)²` block centred on the anchor            |
//! | `Irregular`        | caller-supplied list per direction                 |
//!
//! Every shape covers the same number of cells in all eight directions, so
//! turning in place never changes how many cells an agent holds.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{Cell, CoreError, CoreResult, Direction, Offset};

// ── IrregularShape ────────────────────────────────────────────────────────────

/// Per-direction offset lists for footprints that are not one of the
/// built-in classes (cliffs, tree clusters, odd-shaped buildings).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IrregularShape {
    offsets: [Vec<Offset>; 8],
}

impl IrregularShape {
    /// Build from one offset list per direction, indexed by
    /// [`Direction::index`].
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidFootprint`] if a list is empty, contains a
    /// duplicate, or differs in length from the others.
    pub fn new(offsets: [Vec<Offset>; 8]) -> CoreResult<Self> {
        let expected = offsets[0].len();
        if expected == 0 {
            return Err(CoreError::InvalidFootprint("empty offset list".into()));
        }
        for (dir, list) in Direction::ALL.iter().zip(&offsets) {
            if list.len() != expected {
                return Err(CoreError::InvalidFootprint(format!(
                    "facing {dir} has {} cells, expected {expected}",
                    list.len()
                )));
            }
            let unique: HashSet<&Offset> = list.iter().collect();
            if unique.len() != list.len() {
                return Err(CoreError::InvalidFootprint(format!(
                    "facing {dir} lists a cell twice"
                )));
            }
        }
        Ok(Self { offsets })
    }

    /// The same offsets regardless of facing.
    pub fn uniform(offsets: Vec<Offset>) -> CoreResult<Self> {
        Self::new(std::array::from_fn(|_| offsets.clone()))
    }

    #[inline]
    pub fn offsets(&self, facing: Direction) -> &[Offset] {
        &self.offsets[facing.index()]
    }
}

// ── Footprint ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Footprint {
    Single,
    Pair,
    Square { radius: u8 },
    Irregular(Arc<IrregularShape>),
}

impl Footprint {
    /// A square building footprint with the given odd side length.
    pub fn square(side: u8) -> CoreResult<Self> {
        if side == 0 || side % 2 == 0 {
            return Err(CoreError::InvalidFootprint(format!(
                "square side must be odd, got {side}"
            )));
        }
        Ok(Footprint::Square { radius: side / 2 })
    }

    pub fn irregular(shape: IrregularShape) -> Self {
        Footprint::Irregular(Arc::new(shape))
    }

    /// Number of cells covered in any facing.
    pub fn size(&self) -> usize {
        match self {
            Footprint::Single => 1,
            Footprint::Pair => 2,
            Footprint::Square { radius } => {
                let side = 2 * *radius as usize + 1;
                side * side
            }
            Footprint::Irregular(shape) => shape.offsets(Direction::N).len(),
        }
    }

    /// Offsets relative to the anchor when facing `facing`.
    pub fn offsets(&self, facing: Direction) -> Vec<Offset> {
        match self {
            Footprint::Single => vec![Offset::ZERO],
            Footprint::Pair => vec![Offset::ZERO, -facing.offset()],
            Footprint::Square { radius } => {
                let r = *radius as i32;
                (-r..=r)
                    .flat_map(|dx| (-r..=r).map(move |dy| Offset::new(dx, dy)))
                    .collect()
            }
            Footprint::Irregular(shape) => shape.offsets(facing).to_vec(),
        }
    }

    /// Absolute cells covered with the anchor at `anchor`, facing `facing`.
    pub fn cells(&self, anchor: Cell, facing: Direction) -> Vec<Cell> {
        self.offsets(facing).into_iter().map(|o| anchor + o).collect()
    }
}

// ── Pose ──────────────────────────────────────────────────────────────────────

/// Where an agent is, which way it faces, and what shape it has.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pose {
    pub anchor:    Cell,
    pub facing:    Direction,
    pub footprint: Footprint,
}

impl Pose {
    pub fn new(anchor: Cell, facing: Direction, footprint: Footprint) -> Self {
        Self { anchor, facing, footprint }
    }

    /// Cells currently covered.
    pub fn cells(&self) -> Vec<Cell> {
        self.footprint.cells(self.anchor, self.facing)
    }

    /// Cells that would be covered after turning in place to `facing`.
    pub fn cells_facing(&self, facing: Direction) -> Vec<Cell> {
        self.footprint.cells(self.anchor, facing)
    }

    /// Cells that would be covered after turning to `dir` and stepping once.
    pub fn cells_after_step(&self, dir: Direction) -> Vec<Cell> {
        self.footprint.cells(self.anchor + dir.offset(), dir)
    }

    #[inline]
    pub fn turn(&mut self, facing: Direction) {
        self.facing = facing;
    }

    #[inline]
    pub fn shift(&mut self, dir: Direction) {
        self.anchor = self.anchor + dir.offset();
    }
}
