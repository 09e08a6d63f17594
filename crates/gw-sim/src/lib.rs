//! `gw-sim`: tick loop orchestrator for gridwalk.
//!
//! # Tick loop
//!
//! ```text
//! every tick:
//!   ① Completions: poll the path pool; install each current route with
//!                   MobilityEngine::install_route (failed searches leave the
//!                   agent idle in place).
//!   ② Overflow:    PathPool::update hands at most one queued request to a
//!                   free worker.
//!   ③ Integrate:   MobilityEngine::advance_all, ascending AgentId.
//!   ④ Notify:      OccupancyGrid::take_changes → on_occupancy_changed.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                         |
//! |--------------|--------------------------------------------------|
//! | [`sim`]      | `Sim`, `TickReport`                              |
//! | [`builder`]  | `SimBuilder`                                     |
//! | [`observer`] | `SimObserver` hooks, `NoopObserver`              |
//! | [`error`]    | `SimError`, `SimResult<T>`                       |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `serde`   | Enables serde on config and terrain types.          |
//! | `fx-hash` | FxHash for the path pool's per-agent maps.          |

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, TickReport};
