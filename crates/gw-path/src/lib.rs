//! `gw-path`: terrain costs, path search, and the path worker pool.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`terrain`]   | `TerrainType`, `TerrainWeights`, `TerrainCost`, `TerrainMap`, `CostGrid` |
//! | [`loader`]    | CSV terrain loading                                            |
//! | [`heap`]      | `OpenHeap`: binary min-heap with decrease-key                 |
//! | [`search`]    | `PathSearch`, `PathJob`, `Route`                               |
//! | [`pool`]      | `PathPool`, `PathWorker`, `JobSource`                          |
//! | [`error`]     | `PathError`, `PathResult<T>`                                   |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | `Serialize` on terrain types and weights.                |
//! | `fx-hash` | FxHash for the pool's per-agent maps.                    |

pub mod error;
pub mod heap;
pub mod loader;
pub mod pool;
pub mod search;
pub mod terrain;


pub use error::{PathError, PathResult};
pub use heap::OpenHeap;
pub use loader::{load_terrain_csv, load_terrain_reader};
pub use pool::{CompletedPath, JobSource, PathPool, PathWorker, RequestStatus, WorkerState};
pub use search::{NodeStatus, PathJob, PathSearch, Route};
pub use terrain::{CostGrid, IMPASSABLE, TerrainCost, TerrainMap, TerrainType, TerrainWeights};
