//! `gw-mobility`: agent movement state and the movement integrator.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                       |
//! |-----------------|----------------------------------------------------------------|
//! | [`state`]       | `MovementState`, `MotionStatus`                                |
//! | [`store`]       | `MobilityStore`: states indexed by `AgentId`                   |
//! | [`integrator`]  | `advance`: fractional progress → cell transitions              |
//! | [`engine`]      | `MobilityEngine`: spawn, replan, install routes, tick          |
//! | [`error`]       | `MobilityError`, `MobilityResult<T>`                           |
//!
//! # Movement model
//!
//! Agents move one cell at a time along a queue of directions.  Every tick
//! adds `speed / ticks_per_second` to their progress; each whole unit of
//! progress is one cell transition (see [`integrator`]).  Before committing
//! to a step the agent reserves the cells it will cover after it, which is
//! what keeps footprints disjoint without any look-ahead beyond one step.

pub mod engine;
pub mod error;
pub mod integrator;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::{MobilityEngine, WorldView};
pub use error::{MobilityError, MobilityResult};
pub use integrator::{MoveEvent, StepReport};
pub use state::{MotionStatus, MovementState};
pub use store::MobilityStore;
