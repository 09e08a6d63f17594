//! The shared occupancy/reservation grid.

use gw_core::{AgentId, Cell, Direction, GridBounds, Pose};
use tracing::error;

use crate::{GridError, GridResult, OccupancySnapshot};

/// Owner and reservation layers over a movement grid, stored row-major.
///
/// Every cell whose owner or reserver changes is appended to a change log so
/// that presentation layers (minimap, debug overlays) can redraw just those
/// cells.  Drain it with [`take_changes`](Self::take_changes).
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    bounds:   GridBounds,
    owner:    Vec<Option<AgentId>>,
    reserved: Vec<Option<AgentId>>,
    changes:  Vec<Cell>,
    version:  u64,
}

impl OccupancyGrid {
    pub fn new(bounds: GridBounds) -> Self {
        let n = bounds.cell_count();
        Self {
            bounds,
            owner:    vec![None; n],
            reserved: vec![None; n],
            changes:  Vec::new(),
            version:  0,
        }
    }

    #[inline]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Mark every footprint cell as owned and reserved by `agent`.
    ///
    /// The caller must have checked that no cell is held by another agent
    /// (see [`is_blocked`](Self::is_blocked)).  Violations are a logic error:
    /// they assert in debug builds and are logged and overwritten in release.
    pub fn place(&mut self, agent: AgentId, pose: &Pose) {
        for cell in pose.cells() {
            let Some(i) = self.bounds.index_of(cell) else {
                error!(%agent, %cell, "placing footprint cell off the grid");
                debug_assert!(false, "{agent} placed off the grid at {cell}");
                continue;
            };
            if let Some(other) = self.owner[i].filter(|o| *o != agent) {
                error!(%agent, %other, %cell, "placing onto a cell owned by another agent");
                debug_assert!(false, "{agent} placed onto {cell} owned by {other}");
            }
            self.write(i, Some(agent), Some(agent));
        }
    }

    /// Checked placement for spawning.
    ///
    /// # Errors
    ///
    /// [`GridError::OutOfBounds`] or [`GridError::Blocked`] for the first
    /// offending cell; the grid is left untouched.
    pub fn try_place(&mut self, agent: AgentId, pose: &Pose) -> GridResult<()> {
        for cell in pose.cells() {
            let i = self.bounds.index_of(cell).ok_or(GridError::OutOfBounds(cell))?;
            if let Some(holder) = self.reserved[i].or(self.owner[i]).filter(|h| *h != agent) {
                return Err(GridError::Blocked { cell, holder });
            }
        }
        self.place(agent, pose);
        Ok(())
    }

    /// Clear ownership and reservation of the footprint cells held by `agent`.
    pub fn remove(&mut self, agent: AgentId, pose: &Pose) {
        for cell in pose.cells() {
            if let Some(i) = self.bounds.index_of(cell) {
                let owner = self.owner[i].filter(|o| *o != agent);
                let reserved = self.reserved[i].filter(|r| *r != agent);
                self.write(i, owner, reserved);
            }
        }
    }

    /// Reserve, without owning, the cells the footprint will cover after one
    /// step in `dir` at the current facing.  Cells already reserved by anyone
    /// are left as they are.
    pub fn reserve_future(&mut self, agent: AgentId, pose: &Pose, dir: Direction) {
        let anchor = pose.anchor + dir.offset();
        for cell in pose.footprint.cells(anchor, pose.facing) {
            if let Some(i) = self.bounds.index_of(cell)
                && self.reserved[i].is_none()
            {
                self.write(i, self.owner[i], Some(agent));
            }
        }
    }

    /// Drop every reservation and ownership `agent` holds anywhere, then
    /// place it again at `pose`.
    ///
    /// Called when an agent's route is replaced wholesale; reservations made
    /// for the old route must not linger.  O(cells) per call.
    pub fn on_path_replaced(&mut self, agent: AgentId, pose: &Pose) {
        self.release(agent);
        self.place(agent, pose);
    }

    /// Drop every reservation and ownership `agent` holds (despawn).
    pub fn release(&mut self, agent: AgentId) {
        for i in 0..self.owner.len() {
            if self.owner[i] == Some(agent) || self.reserved[i] == Some(agent) {
                let owner = self.owner[i].filter(|o| *o != agent);
                let reserved = self.reserved[i].filter(|r| *r != agent);
                self.write(i, owner, reserved);
            }
        }
    }

    #[inline]
    fn write(&mut self, i: usize, owner: Option<AgentId>, reserved: Option<AgentId>) {
        if self.owner[i] != owner || self.reserved[i] != reserved {
            self.owner[i] = owner;
            self.reserved[i] = reserved;
            self.changes.push(self.bounds.cell_at(i));
            self.version += 1;
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if any cell is off the grid, or owned or reserved by an agent
    /// other than `excluding`.
    pub fn is_blocked(&self, cells: &[Cell], excluding: Option<AgentId>) -> bool {
        cells.iter().any(|&cell| match self.bounds.index_of(cell) {
            None => true,
            Some(i) => {
                let held_by_other = |slot: Option<AgentId>| slot.is_some_and(|a| Some(a) != excluding);
                held_by_other(self.owner[i]) || held_by_other(self.reserved[i])
            }
        })
    }

    #[inline]
    pub fn cell_owner(&self, cell: Cell) -> Option<AgentId> {
        self.bounds.index_of(cell).and_then(|i| self.owner[i])
    }

    #[inline]
    pub fn cell_reserver(&self, cell: Cell) -> Option<AgentId> {
        self.bounds.index_of(cell).and_then(|i| self.reserved[i])
    }

    /// All cells `agent` owns, in row-major order.
    pub fn owned_cells(&self, agent: AgentId) -> Vec<Cell> {
        self.scan(&self.owner, agent)
    }

    /// All cells `agent` has reserved (owned cells included), row-major.
    pub fn reserved_cells(&self, agent: AgentId) -> Vec<Cell> {
        self.scan(&self.reserved, agent)
    }

    fn scan(&self, layer: &[Option<AgentId>], agent: AgentId) -> Vec<Cell> {
        layer
            .iter()
            .enumerate()
            .filter(|(_, slot)| **slot == Some(agent))
            .map(|(i, _)| self.bounds.cell_at(i))
            .collect()
    }

    /// Blocked mask as seen by `agent`: every cell held by someone else.
    pub fn snapshot_excluding(&self, agent: Option<AgentId>) -> OccupancySnapshot {
        let blocked = self
            .owner
            .iter()
            .zip(&self.reserved)
            .map(|(o, r)| {
                o.is_some_and(|a| Some(a) != agent) || r.is_some_and(|a| Some(a) != agent)
            })
            .collect();
        OccupancySnapshot::from_mask(self.bounds, blocked)
    }

    // ── Change notification ───────────────────────────────────────────────

    /// Cells changed since the last call, in mutation order (may repeat).
    pub fn take_changes(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.changes)
    }

    /// Monotonic count of cell mutations since construction.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}
