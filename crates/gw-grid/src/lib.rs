//! `gw-grid`: who owns and who has reserved every movement cell.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`occupancy`]   | `OccupancyGrid`: owner + reservation layers, change log    |
//! | [`snapshot`]    | `OccupancySnapshot`: immutable blocked mask for searches   |
//! | [`error`]       | `GridError`, `GridResult<T>`                               |
//!
//! # Two layers
//!
//! Each cell has at most one **owner** (the agent physically standing on it)
//! and at most one **reserver**.  Owning implies reserving.  A moving agent
//! additionally reserves the cells it will cover after its next step, so two
//! agents can never commit to stepping into the same cell.
//!
//! All mutation happens on the tick thread.  Background path searches never
//! see the grid itself, only an [`OccupancySnapshot`] taken when the search
//! was dispatched.

pub mod error;
pub mod occupancy;
pub mod snapshot;


pub use error::{GridError, GridResult};
pub use occupancy::OccupancyGrid;
pub use snapshot::OccupancySnapshot;
