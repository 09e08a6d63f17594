//! The `Sim` struct and its tick loop.

use gw_core::{AgentId, Cell, Pose, SimClock, SimConfig, Tick};
use gw_grid::OccupancyGrid;
use gw_mobility::{MobilityEngine, MoveEvent, MovementState};
use gw_path::{CompletedPath, PathPool, RequestStatus, TerrainCost};
use tracing::{trace, warn};

use crate::{SimError, SimObserver, SimResult};

// ── TickReport ────────────────────────────────────────────────────────────────

/// Summary of one call to [`Sim::tick`] (or [`Sim::settle`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub tick:            Tick,
    /// Routes handed to their agents.
    pub paths_installed: u32,
    /// Searches that came back with an error.
    pub paths_failed:    u32,
    /// Whole-cell anchor transitions summed over every agent.
    pub cells_moved:     u64,
    pub arrived:         Vec<AgentId>,
    pub blocked:         Vec<AgentId>,
}

impl TickReport {
    fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<T>` owns the occupancy grid, the path pool and every agent's
/// movement state, and drives the tick loop:
///
/// 1. **Completions**: searches that have come back are installed on their
///    agents (or, on failure, the agent is left idle where it stands).
/// 2. **Overflow**: at most one queued request is handed to a free worker.
/// 3. **Integrate**: every agent advances in ascending `AgentId` order.
/// 4. **Notify**: cells whose occupancy changed are forwarded to the observer.
///
/// All grid mutation happens on the thread calling `tick`; background
/// searches only ever see the snapshot taken when they were dispatched.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<T: TerrainCost + 'static> {
    pub config:   SimConfig,
    pub clock:    SimClock,
    pub grid:     OccupancyGrid,
    pub pool:     PathPool<T>,
    pub mobility: MobilityEngine,
}

impl<T: TerrainCost + 'static> Sim<T> {
    // ── Agents ────────────────────────────────────────────────────────────

    /// Place a new agent.  Fails if any cell of its footprint is off the
    /// grid, owned, or reserved.
    pub fn spawn(&mut self, pose: Pose, speed: f64) -> SimResult<AgentId> {
        Ok(self.mobility.spawn(&mut self.grid, pose, speed)?)
    }

    /// Remove an agent, free its cells, and drop any search it has pending.
    pub fn despawn(&mut self, agent: AgentId) -> SimResult<MovementState> {
        let state = self.mobility.despawn(&mut self.grid, agent)?;
        self.pool.cancel(agent);
        Ok(state)
    }

    /// Order `agent` to `goal`.
    ///
    /// The agent stops translating at once and gives up the reservations of
    /// its old route; it stays put until the new route lands.  A later order
    /// supersedes this one even if this one's search is already running.
    pub fn set_destination(&mut self, agent: AgentId, goal: Cell) -> SimResult<RequestStatus> {
        if !self.grid.bounds().contains(goal) {
            return Err(SimError::GoalOutOfBounds(goal));
        }
        self.mobility.begin_replan(&mut self.grid, agent, goal)?;
        Ok(self.pool.request(agent, goal, &self.mobility.view(&self.grid)))
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.clock.current_tick < self.config.end_tick() {
            self.tick(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    /// Process one tick.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> TickReport {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let mut report = TickReport::new(now);

        // ── Phase 1: install finished searches ────────────────────────────
        let completed = self.pool.poll_completed(&self.mobility.view(&self.grid));
        self.apply_completed(now, completed, &mut report, observer);

        // ── Phase 2: one overflow request per tick ────────────────────────
        self.pool.update(&self.mobility.view(&self.grid));

        // ── Phase 3: integrate movement ───────────────────────────────────
        let steps = self.mobility.advance_all(&mut self.grid, self.config.ticks_per_second);
        for (agent, step) in steps {
            report.cells_moved += u64::from(step.cells_moved);
            if let Some(event) = step.event {
                emit(now, agent, event, &mut report, observer);
            }
        }

        // ── Phase 4: occupancy notification ───────────────────────────────
        let changed = self.grid.take_changes();
        if !changed.is_empty() {
            observer.on_occupancy_changed(now, &changed);
        }

        self.clock.advance();
        observer.on_tick_end(now, &report);
        report
    }

    /// Block until every running and queued search has returned, installing
    /// each result as it lands.  Does not advance the clock or move anyone.
    pub fn settle<O: SimObserver>(&mut self, observer: &mut O) -> TickReport {
        let now = self.clock.current_tick;
        let mut report = TickReport::new(now);
        loop {
            let completed = self.pool.wait_completed(&self.mobility.view(&self.grid));
            self.apply_completed(now, completed, &mut report, observer);
            if self.pool.update(&self.mobility.view(&self.grid)).is_none() {
                break;
            }
        }
        report
    }

    fn apply_completed<O: SimObserver>(
        &mut self,
        now:       Tick,
        completed: Vec<CompletedPath>,
        report:    &mut TickReport,
        observer:  &mut O,
    ) {
        for done in completed {
            let agent = done.agent;
            if self.mobility.state(agent).is_err() {
                trace!(%agent, "route for despawned agent discarded");
                continue;
            }
            observer.on_path_resolved(now, agent, &done.outcome);

            match done.outcome {
                Ok(route) => {
                    report.paths_installed += 1;
                    match self.mobility.install_route(&mut self.grid, agent, route.directions) {
                        Ok(Some(event)) => emit(now, agent, event, report, observer),
                        Ok(None) => {}
                        Err(e) => warn!(%agent, error = %e, "route could not be installed"),
                    }
                }
                Err(e) => {
                    report.paths_failed += 1;
                    warn!(%agent, goal = %done.goal, error = %e, "no route; agent holds position");
                    if let Err(e) = self.mobility.abandon_route(agent) {
                        warn!(%agent, error = %e, "could not reset agent after failed search");
                    }
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if any of `cells` is off the grid, owned, or reserved.
    pub fn is_blocked(&self, cells: &[Cell]) -> bool {
        self.grid.is_blocked(cells, None)
    }

    pub fn cell_owner(&self, cell: Cell) -> Option<AgentId> {
        self.grid.cell_owner(cell)
    }

    pub fn pose(&self, agent: AgentId) -> Option<&Pose> {
        self.mobility.store.get(agent).map(|s| &s.pose)
    }

    pub fn state(&self, agent: AgentId) -> SimResult<&MovementState> {
        Ok(self.mobility.state(agent)?)
    }

    #[inline]
    pub fn agent_count(&self) -> usize {
        self.mobility.store.len()
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn terrain(&self) -> &T {
        self.pool.terrain().as_ref()
    }
}

fn emit<O: SimObserver>(
    now:      Tick,
    agent:    AgentId,
    event:    MoveEvent,
    report:   &mut TickReport,
    observer: &mut O,
) {
    match event {
        MoveEvent::Blocked { at, toward } => {
            report.blocked.push(agent);
            observer.on_blocked(now, agent, at, toward);
        }
        MoveEvent::Arrived { at } => {
            report.arrived.push(agent);
            observer.on_arrived(now, agent, at);
        }
    }
}
