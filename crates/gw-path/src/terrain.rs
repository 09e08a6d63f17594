//! Terrain classes, their movement weights, and the cost lookup searches use.
//!
//! # Weights
//!
//! | Terrain    | Default weight |
//! |------------|----------------|
//! | Grass      | 1              |
//! | Dirt       | 1              |
//! | Rock       | 1              |
//! | Sand       | 2              |
//! | Deep fire  | 3              |
//! | Water      | 500            |
//!
//! Water is not impassable, just expensive enough that any dry detour wins.

use serde::Deserialize;

use gw_core::{Cell, GridBounds};

use crate::{PathError, PathResult};

// ── TerrainType ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    #[default]
    Grass,
    Dirt,
    Sand,
    Rock,
    Water,
    DeepFire,
}

impl TerrainType {
    pub const ALL: [TerrainType; 6] = [
        TerrainType::Grass,
        TerrainType::Dirt,
        TerrainType::Sand,
        TerrainType::Rock,
        TerrainType::Water,
        TerrainType::DeepFire,
    ];
}

// ── TerrainWeights ────────────────────────────────────────────────────────────

/// Movement weight per terrain class.  Weights below 1 are treated as 1.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[serde(default)]
pub struct TerrainWeights {
    pub grass:     u32,
    pub dirt:      u32,
    pub sand:      u32,
    pub rock:      u32,
    pub water:     u32,
    pub deep_fire: u32,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self { grass: 1, dirt: 1, sand: 2, rock: 1, water: 500, deep_fire: 3 }
    }
}

impl TerrainWeights {
    #[inline]
    pub fn weight(&self, terrain: TerrainType) -> u32 {
        let w = match terrain {
            TerrainType::Grass    => self.grass,
            TerrainType::Dirt     => self.dirt,
            TerrainType::Sand     => self.sand,
            TerrainType::Rock     => self.rock,
            TerrainType::Water    => self.water,
            TerrainType::DeepFire => self.deep_fire,
        };
        w.max(1)
    }
}

// ── TerrainCost trait ─────────────────────────────────────────────────────────

/// Cost of a cell no route may enter: off-map cells, or cells a caller has
/// walled off with [`CostGrid::set`].
pub const IMPASSABLE: u32 = u32::MAX;

/// Per-cell movement weight lookup consumed by path searches.
///
/// # Thread safety
///
/// Implementations are shared behind an `Arc` with background search
/// threads, so they must be `Send + Sync` and are only ever read.
pub trait TerrainCost: Send + Sync {
    /// Extent of the movement grid this terrain covers.
    fn bounds(&self) -> GridBounds;

    /// Weight of entering `cell`; at least 1 for every in-bounds cell.
    /// [`IMPASSABLE`] means searches never step onto it.
    fn cost(&self, cell: Cell) -> u32;
}

// ── TerrainMap ────────────────────────────────────────────────────────────────

/// Terrain stored per tile; each tile covers `SPACES_PER_TILE²` movement cells.
///
/// Tile `(0, 0)` is the south-west corner.
#[derive(Clone, Debug)]
pub struct TerrainMap {
    tiles_w: u32,
    tiles_h: u32,
    tiles:   Vec<TerrainType>,
    weights: TerrainWeights,
}

impl TerrainMap {
    /// A `tiles_w × tiles_h` map filled with `fill`.
    pub fn filled(tiles_w: u32, tiles_h: u32, fill: TerrainType) -> Self {
        Self {
            tiles_w,
            tiles_h,
            tiles: vec![fill; tiles_w as usize * tiles_h as usize],
            weights: TerrainWeights::default(),
        }
    }

    /// Build from row-major tiles, south row first.
    pub fn from_tiles(tiles_w: u32, tiles_h: u32, tiles: Vec<TerrainType>) -> PathResult<Self> {
        if tiles_w == 0 || tiles_h == 0 {
            return Err(PathError::Terrain("terrain map has zero area".into()));
        }
        let expected = tiles_w as usize * tiles_h as usize;
        if tiles.len() != expected {
            return Err(PathError::Terrain(format!(
                "expected {expected} tiles for {tiles_w}x{tiles_h}, got {}",
                tiles.len()
            )));
        }
        Ok(Self { tiles_w, tiles_h, tiles, weights: TerrainWeights::default() })
    }

    pub fn with_weights(mut self, weights: TerrainWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn weights(&self) -> &TerrainWeights {
        &self.weights
    }

    #[inline]
    pub fn tiles_w(&self) -> u32 {
        self.tiles_w
    }

    #[inline]
    pub fn tiles_h(&self) -> u32 {
        self.tiles_h
    }

    fn tile_index(&self, tx: i32, ty: i32) -> Option<usize> {
        (tx >= 0 && ty >= 0 && (tx as u32) < self.tiles_w && (ty as u32) < self.tiles_h)
            .then(|| ty as usize * self.tiles_w as usize + tx as usize)
    }

    pub fn tile(&self, tx: i32, ty: i32) -> Option<TerrainType> {
        self.tile_index(tx, ty).map(|i| self.tiles[i])
    }

    /// Overwrite one tile.  Off-map coordinates are ignored.
    pub fn set_tile(&mut self, tx: i32, ty: i32, terrain: TerrainType) {
        if let Some(i) = self.tile_index(tx, ty) {
            self.tiles[i] = terrain;
        }
    }

    /// Terrain under a movement cell.
    pub fn terrain_at(&self, cell: Cell) -> Option<TerrainType> {
        let (tx, ty) = cell.tile();
        self.tile(tx, ty)
    }
}

impl TerrainCost for TerrainMap {
    fn bounds(&self) -> GridBounds {
        GridBounds::from_tiles(self.tiles_w, self.tiles_h)
    }

    fn cost(&self, cell: Cell) -> u32 {
        self.terrain_at(cell)
            .map_or(IMPASSABLE, |t| self.weights.weight(t))
    }
}

// ── CostGrid ──────────────────────────────────────────────────────────────────

/// Weights stored per movement cell, for maps authored at cell resolution.
#[derive(Clone, Debug)]
pub struct CostGrid {
    bounds: GridBounds,
    costs:  Vec<u32>,
}

impl CostGrid {
    pub fn uniform(bounds: GridBounds, weight: u32) -> Self {
        Self { bounds, costs: vec![weight.max(1); bounds.cell_count()] }
    }

    /// Set the weight of one cell; [`IMPASSABLE`] walls it off.  Off-grid
    /// cells are ignored.
    pub fn set(&mut self, cell: Cell, weight: u32) {
        if let Some(i) = self.bounds.index_of(cell) {
            self.costs[i] = weight.max(1);
        }
    }

    /// Rasterize a tile map down to cell resolution.
    pub fn from_map(map: &TerrainMap) -> Self {
        let bounds = map.bounds();
        let costs = bounds.cells().map(|c| map.cost(c)).collect();
        Self { bounds, costs }
    }
}

impl TerrainCost for CostGrid {
    fn bounds(&self) -> GridBounds {
        self.bounds
    }

    fn cost(&self, cell: Cell) -> u32 {
        self.bounds.index_of(cell).map_or(IMPASSABLE, |i| self.costs[i])
    }
}
