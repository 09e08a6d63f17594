//! Immutable blocked-cell mask handed to path searches.

use gw_core::{Cell, GridBounds};

/// A point-in-time copy of which cells are unavailable to one agent.
///
/// Taken by [`OccupancyGrid::snapshot_excluding`][crate::OccupancyGrid::snapshot_excluding]
/// on the tick thread and then moved into a background search, so the search
/// never races with grid mutation.  Off-grid cells always count as blocked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancySnapshot {
    bounds:  GridBounds,
    blocked: Vec<bool>,
}

impl OccupancySnapshot {
    /// A mask with nothing blocked.
    pub fn open(bounds: GridBounds) -> Self {
        Self { bounds, blocked: vec![false; bounds.cell_count()] }
    }

    pub(crate) fn from_mask(bounds: GridBounds, blocked: Vec<bool>) -> Self {
        debug_assert_eq!(blocked.len(), bounds.cell_count());
        Self { bounds, blocked }
    }

    #[inline]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Mark `cell` as blocked.  Off-grid cells are ignored.
    pub fn block(&mut self, cell: Cell) {
        if let Some(i) = self.bounds.index_of(cell) {
            self.blocked[i] = true;
        }
    }

    #[inline]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.bounds.index_of(cell).is_none_or(|i| self.blocked[i])
    }

    /// `true` if every cell is on the grid and unblocked.
    pub fn fits(&self, cells: &[Cell]) -> bool {
        cells.iter().all(|c| !self.is_blocked(*c))
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }
}
