//! CSV terrain loader.
//!
//! # CSV format
//!
//! One row per tile row, one terrain name per column, no header.  The
//! **first row is the northern edge** of the map, so the file reads like the
//! map looks:
//!
//! ```csv
//! grass,grass,water,water
//! grass,sand, water,rock
//! dirt, dirt, grass,deep_fire
//! ```
//!
//! Names are `grass`, `dirt`, `sand`, `rock`, `water`, `deep_fire`;
//! surrounding whitespace is ignored.  Every row must have the same width.

use std::io::Read;
use std::path::Path;

use crate::{PathError, PathResult, TerrainMap, TerrainType};

/// Load a [`TerrainMap`] from a CSV file.
pub fn load_terrain_csv(path: &Path) -> PathResult<TerrainMap> {
    let file = std::fs::File::open(path).map_err(PathError::Io)?;
    load_terrain_reader(file)
}

/// Like [`load_terrain_csv`] but accepts any `Read` source.
pub fn load_terrain_reader<R: Read>(reader: R) -> PathResult<TerrainMap> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Rows arrive north-first; collect then flip so row 0 is the south edge.
    let mut rows: Vec<Vec<TerrainType>> = Vec::new();
    for result in csv_reader.deserialize() {
        let row: Vec<TerrainType> = result?;
        rows.push(row);
    }

    let tiles_h = rows.len();
    let tiles_w = rows.first().map_or(0, Vec::len);
    if tiles_w == 0 {
        return Err(PathError::Terrain("terrain CSV is empty".into()));
    }

    let tiles: Vec<TerrainType> = rows.into_iter().rev().flatten().collect();
    TerrainMap::from_tiles(tiles_w as u32, tiles_h as u32, tiles)
}
