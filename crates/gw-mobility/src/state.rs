//! Per-agent movement state.

use std::collections::VecDeque;

use gw_core::{Cell, Direction, Pose};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum MotionStatus {
    /// Standing still with nothing to do.
    #[default]
    Idle,
    /// A destination was set; its route has not been installed yet.
    AwaitingPath,
    /// Following a route.
    Moving,
    /// Stopped because the next step was occupied; the route was dropped.
    Blocked,
}

/// The movement state for a single agent.
///
/// An agent is **translating** while `direction` is `Some`: the anchor will
/// shift one cell in that direction at the next whole cell of progress.  The
/// cells it will cover after that shift are already reserved in the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    pub pose: Pose,

    /// Direction of the step in progress, `None` when not translating.
    pub direction: Option<Direction>,

    /// Steps still to take after the current one.
    pub path: VecDeque<Direction>,

    /// Fraction of a cell covered toward the next transition, in `[0, 1)`
    /// between ticks.
    pub progress: f64,

    /// Cells per game second.
    pub speed: f64,

    /// Where the agent was last told to go.
    pub goal: Option<Cell>,

    pub status: MotionStatus,
}

impl MovementState {
    pub fn new(pose: Pose, speed: f64) -> Self {
        Self {
            pose,
            direction: None,
            path: VecDeque::new(),
            progress: 0.0,
            speed: speed.max(0.0),
            goal: None,
            status: MotionStatus::Idle,
        }
    }

    /// Not translating and nothing queued.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.direction.is_none() && self.path.is_empty()
    }

    /// Stop translating and forget the remaining route.
    pub fn halt(&mut self) {
        self.direction = None;
        self.path.clear();
    }

    /// Steps left including the one in progress.
    pub fn steps_remaining(&self) -> usize {
        self.path.len() + usize::from(self.direction.is_some())
    }
}
