//! Turns per-tick fractional progress into discrete cell transitions.
//!
//! # One transition
//!
//! Each whole cell of progress performs, in order:
//!
//! 1. **Shift.** If the agent is translating, lift its footprint off the
//!    grid, move the anchor one cell along `direction`, and put it back.
//!    The destination cells were reserved one step earlier, so this never
//!    collides.
//! 2. **Peek.** Look at the next queued direction `d`.
//!    - none: the route is finished; stop translating.
//!    - the footprint turned to `d` in place, or turned and stepped once,
//!      touches a cell held by another agent: **halt**, drop the route, and
//!      report [`MoveEvent::Blocked`].
//!    - otherwise turn to `d`, reserve the cells of the step after it, and
//!      consume `d` from the queue.
//!
//! An agent that is neither translating nor holding a route does not bank
//! progress: it is clamped to zero so a later order starts from rest.

use gw_core::{AgentId, Cell, Direction};
use gw_grid::OccupancyGrid;
use tracing::{debug, trace};

use crate::{MotionStatus, MovementState};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MoveEvent {
    /// The step toward `toward` from `at` was occupied; the route was dropped.
    Blocked { at: Cell, toward: Direction },
    /// The route ran out with the anchor at `at`.
    Arrived { at: Cell },
}

/// What one call to [`advance`] did.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct StepReport {
    /// Whole cells the anchor moved.
    pub cells_moved: u32,
    pub event:       Option<MoveEvent>,
}

/// Outcome of trying to begin the next queued step.
enum NextStep {
    Started,
    Finished,
    Blocked(Direction),
}

/// Advance `agent` by one tick at `ticks_per_second`.
pub fn advance(
    agent:            AgentId,
    state:            &mut MovementState,
    grid:             &mut OccupancyGrid,
    ticks_per_second: u32,
) -> StepReport {
    let mut report = StepReport::default();
    state.progress += state.speed / ticks_per_second as f64;

    while state.progress >= 1.0 {
        state.progress -= 1.0;

        if state.is_stationary() {
            state.progress = 0.0;
            break;
        }

        let was_translating = state.direction.is_some();
        if let Some(dir) = state.direction {
            grid.remove(agent, &state.pose);
            state.pose.shift(dir);
            grid.place(agent, &state.pose);
            report.cells_moved += 1;
        }

        match begin_next_step(agent, state, grid) {
            NextStep::Started => {}
            NextStep::Finished => {
                if was_translating {
                    trace!(%agent, at = %state.pose.anchor, "arrived");
                    report.event = Some(MoveEvent::Arrived { at: state.pose.anchor });
                }
                state.progress = 0.0;
                break;
            }
            NextStep::Blocked(toward) => {
                report.event = Some(MoveEvent::Blocked { at: state.pose.anchor, toward });
                state.progress = 0.0;
                break;
            }
        }
    }
    report
}

/// Kick off a freshly installed route without waiting for a whole cell of
/// progress, so the first transition after this is a real step.
///
/// Does nothing if the agent is already translating.
pub fn start_route(
    agent: AgentId,
    state: &mut MovementState,
    grid:  &mut OccupancyGrid,
) -> Option<MoveEvent> {
    if state.direction.is_some() {
        return None;
    }
    match begin_next_step(agent, state, grid) {
        NextStep::Started => None,
        NextStep::Finished => Some(MoveEvent::Arrived { at: state.pose.anchor }),
        NextStep::Blocked(toward) => Some(MoveEvent::Blocked { at: state.pose.anchor, toward }),
    }
}

fn begin_next_step(
    agent: AgentId,
    state: &mut MovementState,
    grid:  &mut OccupancyGrid,
) -> NextStep {
    let Some(&next) = state.path.front() else {
        state.direction = None;
        state.status = MotionStatus::Idle;
        return NextStep::Finished;
    };

    let turned = state.pose.cells_facing(next);
    let stepped = state.pose.cells_after_step(next);
    if grid.is_blocked(&turned, Some(agent)) || grid.is_blocked(&stepped, Some(agent)) {
        debug!(%agent, at = %state.pose.anchor, toward = %next, "next step occupied; halting");
        state.halt();
        state.status = MotionStatus::Blocked;
        return NextStep::Blocked(next);
    }

    grid.remove(agent, &state.pose);
    state.pose.turn(next);
    grid.place(agent, &state.pose);
    grid.reserve_future(agent, &state.pose, next);

    state.path.pop_front();
    state.direction = Some(next);
    state.status = MotionStatus::Moving;
    NextStep::Started
}
