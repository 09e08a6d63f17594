//! High-level mobility engine: spawning, route installation, and per-tick
//! advancement over a shared [`OccupancyGrid`].

use gw_core::{AgentId, Cell, Direction, Pose};
use gw_grid::OccupancyGrid;
use gw_path::{JobSource, PathJob};

use crate::integrator::{self, MoveEvent, StepReport};
use crate::{MobilityError, MobilityResult, MobilityStore, MotionStatus, MovementState};

/// Owns every agent's [`MovementState`].  The grid is passed in by the
/// caller so that the simulation can lend it to path dispatch and to the
/// engine in the same tick without shared ownership.
#[derive(Debug, Default)]
pub struct MobilityEngine {
    pub store: MobilityStore,
}

impl MobilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new agent on the grid.
    ///
    /// # Errors
    ///
    /// [`MobilityError::Grid`] if any footprint cell is off the grid or held.
    pub fn spawn(&mut self, grid: &mut OccupancyGrid, pose: Pose, speed: f64) -> MobilityResult<AgentId> {
        let id = self.store.next_id();
        grid.try_place(id, &pose)?;
        Ok(self.store.insert(MovementState::new(pose, speed)))
    }

    /// Remove an agent and every cell it holds or has reserved.
    pub fn despawn(&mut self, grid: &mut OccupancyGrid, agent: AgentId) -> MobilityResult<MovementState> {
        let state = self.store.remove(agent).ok_or(MobilityError::UnknownAgent(agent))?;
        grid.release(agent);
        Ok(state)
    }

    pub fn state(&self, agent: AgentId) -> MobilityResult<&MovementState> {
        self.store.get(agent).ok_or(MobilityError::UnknownAgent(agent))
    }

    fn state_mut(&mut self, agent: AgentId) -> MobilityResult<&mut MovementState> {
        self.store.get_mut(agent).ok_or(MobilityError::UnknownAgent(agent))
    }

    /// A new destination was ordered: stop translating, drop the old route,
    /// and release the reservations it made.  The agent then waits for its
    /// new route.
    pub fn begin_replan(
        &mut self,
        grid:  &mut OccupancyGrid,
        agent: AgentId,
        goal:  Cell,
    ) -> MobilityResult<()> {
        let state = self.state_mut(agent)?;
        state.halt();
        state.goal = Some(goal);
        state.status = MotionStatus::AwaitingPath;
        grid.on_path_replaced(agent, &state.pose);
        Ok(())
    }

    /// Replace the agent's route with `directions` and try to start it.
    ///
    /// Returns the event from the first step attempt: `Blocked` if the first
    /// step is already occupied, `Arrived` for an empty route.
    pub fn install_route(
        &mut self,
        grid:       &mut OccupancyGrid,
        agent:      AgentId,
        directions: Vec<Direction>,
    ) -> MobilityResult<Option<MoveEvent>> {
        let state = self.state_mut(agent)?;
        state.halt();
        grid.on_path_replaced(agent, &state.pose);
        state.path = directions.into();
        Ok(integrator::start_route(agent, state, grid))
    }

    /// The agent's search failed; it stays where it is.
    pub fn abandon_route(&mut self, agent: AgentId) -> MobilityResult<()> {
        let state = self.state_mut(agent)?;
        state.halt();
        state.status = MotionStatus::Idle;
        Ok(())
    }

    /// Advance every agent by one tick, in ascending id order.
    ///
    /// Returns a report for each agent that moved or produced an event.
    pub fn advance_all(
        &mut self,
        grid:             &mut OccupancyGrid,
        ticks_per_second: u32,
    ) -> Vec<(AgentId, StepReport)> {
        self.store
            .iter_mut()
            .filter_map(|(agent, state)| {
                let report = integrator::advance(agent, state, grid, ticks_per_second);
                (report.cells_moved > 0 || report.event.is_some()).then_some((agent, report))
            })
            .collect()
    }

    /// Read-only view used to build path jobs at dispatch time.
    pub fn view<'a>(&'a self, grid: &'a OccupancyGrid) -> WorldView<'a> {
        WorldView { engine: self, grid }
    }
}

// ── WorldView ─────────────────────────────────────────────────────────────────

/// Agents plus grid, borrowed together to answer [`JobSource`] queries.
pub struct WorldView<'a> {
    engine: &'a MobilityEngine,
    grid:   &'a OccupancyGrid,
}

impl JobSource for WorldView<'_> {
    fn job_for(&self, agent: AgentId, goal: Cell) -> Option<PathJob> {
        let state = self.engine.store.get(agent)?;
        Some(PathJob {
            agent,
            start:     state.pose.anchor,
            goal,
            footprint: state.pose.footprint.clone(),
            snapshot:  self.grid.snapshot_excluding(Some(agent)),
        })
    }
}
