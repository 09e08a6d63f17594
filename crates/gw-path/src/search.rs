//! Weighted best-first search over the movement grid.
//!
//! # Cost model
//!
//! Entering neighbor `nb` from `cur` costs
//!
//!   round(euclidean(cur, nb) * weight(nb) + manhattan(nb, goal))
//!
//! added to `cur`'s accumulated path length.  The heuristic is folded into
//! the accumulated cost instead of being kept as a separate `f = g + h`, so
//! the search is greedy toward the goal and its routes are not guaranteed to
//! be the cheapest.
//!
//! Cells whose weight is [`IMPASSABLE`](crate::IMPASSABLE) are never entered.
//! Water is merely expensive, so it is crossed when nothing dry connects.
//!
//! # Footprints
//!
//! A step from `cur` toward `nb` in direction `d` is admissible only when the
//! agent's footprint facing `d` fits both at `cur` (turning in place) and at
//! `nb` (after the step), checked against the occupancy snapshot taken when
//! the search was dispatched.
//!
//! # Scratch reuse
//!
//! [`PathSearch`] owns all its arrays and resets only the cells it touched,
//! so a worker can run thousands of searches without reallocating.

use gw_core::{AgentId, Cell, Direction, Footprint, GridBounds, Offset};
use gw_grid::OccupancySnapshot;

use crate::{IMPASSABLE, PathError, PathResult, TerrainCost};
use crate::heap::OpenHeap;

/// Sentinel for "no node" in parent pointers and the cell → node table.
const NO_NODE: u32 = u32::MAX;

// ── Job & route ───────────────────────────────────────────────────────────────

/// Everything a search needs, captured on the tick thread.
#[derive(Debug, Clone)]
pub struct PathJob {
    pub agent:     AgentId,
    pub start:     Cell,
    pub goal:      Cell,
    pub footprint: Footprint,
    /// Cells held by other agents at dispatch time.
    pub snapshot:  OccupancySnapshot,
}

/// A computed route: the steps to take and the cells visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// One direction per step, in travel order.
    pub directions: Vec<Direction>,
    /// Anchor cells from start to goal inclusive; `directions.len() + 1` long.
    pub cells:      Vec<Cell>,
    /// Accumulated search cost at the goal.
    pub total_cost: u32,
    /// Cells closed before the goal was reached.
    pub expanded:   u32,
}

impl Route {
    pub fn trivial(at: Cell) -> Self {
        Self { directions: Vec::new(), cells: vec![at], total_cost: 0, expanded: 0 }
    }

    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.directions.is_empty()
    }
}

// ── PathSearch ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum NodeStatus {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Reusable search scratch.  Never shared between concurrent searches.
#[derive(Debug, Default)]
pub struct PathSearch {
    max_expansions: Option<u32>,

    // Per node, indexed by node id (allocation order).
    path_lengths: Vec<u32>,
    coords:       Vec<Cell>,
    parent:       Vec<u32>,

    // Per cell, row-major.
    status:  Vec<NodeStatus>,
    node_of: Vec<u32>,

    heap: OpenHeap,
}

impl PathSearch {
    pub fn new(max_expansions: Option<u32>) -> Self {
        Self { max_expansions, ..Self::default() }
    }

    /// Compute a route for `job` over `terrain`.
    ///
    /// # Errors
    ///
    /// - [`PathError::OutOfBounds`] if start or goal is off the terrain.
    /// - [`PathError::NoRoute`] if the goal cannot hold the footprint or the
    ///   open set empties first.
    /// - [`PathError::BudgetExhausted`] if the expansion budget runs out.
    pub fn find_path<T: TerrainCost + ?Sized>(
        &mut self,
        terrain: &T,
        job:     &PathJob,
    ) -> PathResult<Route> {
        let bounds = terrain.bounds();
        for cell in [job.start, job.goal] {
            if !bounds.contains(cell) {
                return Err(PathError::OutOfBounds(cell));
            }
        }
        if job.start == job.goal {
            return Ok(Route::trivial(job.start));
        }

        let offsets: [Vec<Offset>; 8] =
            std::array::from_fn(|i| job.footprint.offsets(Direction::ALL[i]));

        let goal_fits = offsets.iter().any(|o| fits(&job.snapshot, job.goal, o));
        if !goal_fits {
            return Err(PathError::NoRoute { from: job.start, to: job.goal });
        }

        self.prepare(bounds);
        let result = self.run(terrain, bounds, job, &offsets);
        self.reset(bounds);
        result
    }

    fn prepare(&mut self, bounds: GridBounds) {
        let n = bounds.cell_count();
        if self.status.len() != n {
            self.status = vec![NodeStatus::Unvisited; n];
            self.node_of = vec![NO_NODE; n];
        }
    }

    /// Undo every per-cell write of the last search.
    fn reset(&mut self, bounds: GridBounds) {
        for cell in &self.coords {
            if let Some(i) = bounds.index_of(*cell) {
                self.status[i] = NodeStatus::Unvisited;
                self.node_of[i] = NO_NODE;
            }
        }
        self.path_lengths.clear();
        self.coords.clear();
        self.parent.clear();
        self.heap.clear();
    }

    fn open(&mut self, cell_idx: usize, cell: Cell, parent: u32, cost: u32) {
        let id = self.coords.len() as u32;
        self.coords.push(cell);
        self.parent.push(parent);
        self.path_lengths.push(cost);
        self.status[cell_idx] = NodeStatus::Open;
        self.node_of[cell_idx] = id;
        self.heap.push(id, &self.path_lengths);
    }

    fn run<T: TerrainCost + ?Sized>(
        &mut self,
        terrain: &T,
        bounds:  GridBounds,
        job:     &PathJob,
        offsets: &[Vec<Offset>; 8],
    ) -> PathResult<Route> {
        let (start, goal) = (job.start, job.goal);
        let no_route = || PathError::NoRoute { from: start, to: goal };

        let start_idx = bounds.index_of(start).ok_or(PathError::OutOfBounds(start))?;
        self.open(start_idx, start, NO_NODE, 0);

        let mut expanded: u32 = 0;
        let goal_node = loop {
            let node = self.heap.pop_min(&self.path_lengths).ok_or_else(no_route)?;
            let cur = self.coords[node as usize];
            let cur_idx = bounds.index_of(cur).ok_or(PathError::OutOfBounds(cur))?;
            self.status[cur_idx] = NodeStatus::Closed;
            if cur == goal {
                break node;
            }

            expanded += 1;
            if let Some(limit) = self.max_expansions
                && expanded > limit
            {
                return Err(PathError::BudgetExhausted { from: start, to: goal, expanded });
            }

            let base = self.path_lengths[node as usize];
            for nb in bounds.neighbors(cur) {
                let Some(nb_idx) = bounds.index_of(nb) else { continue };
                if self.status[nb_idx] == NodeStatus::Closed {
                    continue;
                }
                let Some(dir) = Direction::from_delta(nb.x - cur.x, nb.y - cur.y) else {
                    continue;
                };
                let shape = &offsets[dir.index()];
                if !fits(&job.snapshot, cur, shape) || !fits(&job.snapshot, nb, shape) {
                    continue;
                }

                let weight = terrain.cost(nb);
                if weight == IMPASSABLE {
                    continue;
                }

                let step = cur.euclidean(nb) * weight as f64 + nb.manhattan(goal) as f64;
                let tentative = base.saturating_add(step.round() as u32);

                match self.status[nb_idx] {
                    NodeStatus::Unvisited => self.open(nb_idx, nb, node, tentative),
                    NodeStatus::Open => {
                        let id = self.node_of[nb_idx];
                        if tentative < self.path_lengths[id as usize] {
                            self.path_lengths[id as usize] = tentative;
                            self.parent[id as usize] = node;
                            self.heap.decrease_key(id, &self.path_lengths);
                        }
                    }
                    NodeStatus::Closed => {}
                }
            }
        };

        self.retrace(goal_node, expanded)
    }

    /// Walk parent pointers back from the goal; iterative so route length is
    /// bounded only by memory.
    fn retrace(&self, goal_node: u32, expanded: u32) -> PathResult<Route> {
        let mut cells = Vec::new();
        let mut node = goal_node;
        while node != NO_NODE {
            cells.push(self.coords[node as usize]);
            node = self.parent[node as usize];
        }
        cells.reverse();

        let directions = cells
            .windows(2)
            .map(|w| Direction::between(w[0], w[1]))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                debug_assert!(false, "non-adjacent cells in retraced route: {e}");
                PathError::InvalidTrace(e)
            })?;

        Ok(Route {
            directions,
            cells,
            total_cost: self.path_lengths[goal_node as usize],
            expanded,
        })
    }
}

/// Footprint with these offsets, anchored at `anchor`, is clear of the snapshot.
#[inline]
fn fits(snapshot: &OccupancySnapshot, anchor: Cell, offsets: &[Offset]) -> bool {
    offsets.iter().all(|o| !snapshot.is_blocked(anchor + *o))
}
