//! Simulation observer trait for progress reporting and game-side hooks.

use gw_core::{AgentId, Cell, Direction, Tick};
use gw_path::{PathResult, Route};

use crate::TickReport;

/// Callbacks invoked by [`Sim::tick`][crate::Sim::tick] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: re-issue orders for blocked units
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Stuck(Vec<AgentId>);
///
/// impl SimObserver for Stuck {
///     fn on_blocked(&mut self, _tick: Tick, agent: AgentId, _at: Cell, _toward: Direction) {
///         self.0.push(agent);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with its summary.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// A search for `agent` came back and is about to be applied.  Stale
    /// results superseded by a newer order never reach this hook.
    fn on_path_resolved(&mut self, _tick: Tick, _agent: AgentId, _outcome: &PathResult<Route>) {}

    /// `agent` halted at `at` because the step toward `toward` was held by
    /// another agent.  Its route has been dropped.
    fn on_blocked(&mut self, _tick: Tick, _agent: AgentId, _at: Cell, _toward: Direction) {}

    /// `agent` finished its route with its anchor on `at`.
    fn on_arrived(&mut self, _tick: Tick, _agent: AgentId, _at: Cell) {}

    /// Cells whose owner or reservation changed during the tick, in the
    /// order they changed.  May contain duplicates.  Not called when nothing
    /// changed.
    fn on_occupancy_changed(&mut self, _tick: Tick, _cells: &[Cell]) {}

    /// Called once after [`Sim::run`][crate::Sim::run] reaches the end tick.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
