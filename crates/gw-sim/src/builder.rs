//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use gw_core::{Pose, SimConfig};
use gw_grid::OccupancyGrid;
use gw_mobility::MobilityEngine;
use gw_path::{PathPool, TerrainCost};
use tracing::debug;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<T>`].
///
/// The grid takes its bounds from `terrain.bounds()`.  Agents added with
/// [`agent`](Self::agent) are spawned in order, so the first gets
/// `AgentId(0)`.
///
/// # Example
///
/// ```rust,ignore
/// let terrain = Arc::new(TerrainMap::filled(20, 20, TerrainType::Grass));
/// let mut sim = SimBuilder::new(SimConfig::default(), terrain)
///     .agent(Pose::new(Cell::new(1, 1), Direction::N, Footprint::Single), 30.0)
///     .build()?;
/// sim.set_destination(AgentId(0), Cell::new(40, 40))?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<T: TerrainCost + 'static> {
    config:  SimConfig,
    terrain: Arc<T>,
    agents:  Vec<(Pose, f64)>,
}

impl<T: TerrainCost + 'static> SimBuilder<T> {
    pub fn new(config: SimConfig, terrain: Arc<T>) -> Self {
        Self { config, terrain, agents: Vec::new() }
    }

    /// Spawn an agent at `pose` moving at `speed` cells per second.
    pub fn agent(mut self, pose: Pose, speed: f64) -> Self {
        self.agents.push((pose, speed));
        self
    }

    /// Validate the config, start the path pool, and place initial agents.
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`][crate::SimError::Config] for an unusable config.
    /// - [`SimError::Path`][crate::SimError::Path] if search threads fail to start.
    /// - [`SimError::Mobility`][crate::SimError::Mobility] if two initial
    ///   agents overlap or one is off the grid.
    pub fn build(self) -> SimResult<Sim<T>> {
        self.config.validate()?;

        let grid = OccupancyGrid::new(self.terrain.bounds());
        let pool = PathPool::new(self.terrain, &self.config)?;
        debug!(
            bounds = %grid.bounds(),
            workers = self.config.worker_count,
            background = self.config.background_search,
            "simulation built"
        );

        let mut sim = Sim {
            clock:    self.config.make_clock(),
            config:   self.config,
            grid,
            pool,
            mobility: MobilityEngine::new(),
        };
        for (pose, speed) in self.agents {
            sim.spawn(pose, speed)?;
        }
        Ok(sim)
    }
}
