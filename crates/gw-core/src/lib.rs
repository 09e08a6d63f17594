//! `gw-core`: foundational types for the `gridwalk` movement core.
//!
//! This crate is a dependency of every other `gw-*` crate.  It has no `gw-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `WorkerId`                                 |
//! | [`cell`]        | `Cell`, `Offset`, `GridBounds`, `SPACES_PER_TILE`     |
//! | [`direction`]   | `Direction`: the eight compass moves                  |
//! | [`footprint`]   | `Footprint` shape classes, `Pose`                     |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `SimRng` (global, seeded)                             |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Coordinate convention
//!
//! `x` grows east, `y` grows north.  [`Direction::N`] is therefore the offset
//! `(0, +1)`.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod cell;
pub mod direction;
pub mod error;
pub mod footprint;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{Cell, GridBounds, Offset, SPACES_PER_TILE};
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use footprint::{Footprint, IrregularShape, Pose};
pub use ids::{AgentId, WorkerId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
