//! skirmish: a squad of mixed-size units crosses a river.
//!
//! Units spawn on the western bank and are ordered to random cells on the
//! eastern bank.  The river is water (weight 500) except for one rock ford,
//! so nearly every route funnels through it and units regularly block each
//! other.  Blocked units are simply re-ordered to the same goal.
//!
//! ```text
//! skirmish [config.json] [terrain.csv]
//! ```
//!
//! `config.json` is a `SimConfig`; missing fields take their defaults.  Set
//! `RUST_LOG=debug` to watch dispatch and completion of every search.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gw_core::{AgentId, Cell, Direction, Footprint, Pose, SimConfig, SimRng, Tick};
use gw_path::{PathResult, Route, TerrainMap, load_terrain_csv, load_terrain_reader};
use gw_sim::{SimBuilder, SimObserver, TickReport};

// ── Constants ─────────────────────────────────────────────────────────────────

const UNIT_COUNT:     usize = 24;
const SEED:           u64   = 42;
const SIM_SECONDS:    u64   = 60;
const SPAWN_ATTEMPTS: usize = 1_000;

// 12 × 8 tiles, north row first.  Each tile is 3 × 3 cells.
const MAP_CSV: &str = "\
grass,grass,grass,sand,water,water,sand,grass,grass,grass,dirt,dirt\n\
grass,grass,dirt, sand,water,water,sand,grass,grass,rock, dirt,dirt\n\
grass,dirt, dirt, sand,water,water,sand,grass,grass,rock, grass,grass\n\
grass,grass,grass,rock,rock, rock, rock,grass,grass,grass,grass,grass\n\
grass,grass,grass,sand,water,water,sand,grass,deep_fire,grass,grass,grass\n\
grass,rock, grass,sand,water,water,sand,grass,deep_fire,grass,grass,grass\n\
grass,grass,grass,sand,water,water,sand,dirt, grass,grass,grass,grass\n\
grass,grass,grass,sand,water,water,sand,dirt, dirt, grass,grass,grass\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SkirmishObserver {
    routes:        u32,
    failed:        u32,
    arrivals:      u32,
    blocks:        u32,
    changed_cells: usize,
}

impl SimObserver for SkirmishObserver {
    fn on_path_resolved(&mut self, _tick: Tick, agent: AgentId, outcome: &PathResult<Route>) {
        match outcome {
            Ok(_) => self.routes += 1,
            Err(e) => {
                self.failed += 1;
                warn!(%agent, error = %e, "unit has no route");
            }
        }
    }

    fn on_blocked(&mut self, _tick: Tick, _agent: AgentId, _at: Cell, _toward: Direction) {
        self.blocks += 1;
    }

    fn on_arrived(&mut self, tick: Tick, agent: AgentId, at: Cell) {
        self.arrivals += 1;
        info!(%tick, %agent, %at, "unit arrived");
    }

    fn on_occupancy_changed(&mut self, _tick: Tick, cells: &[Cell]) {
        self.changed_cells += cells.len();
    }

    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        if !report.blocked.is_empty() {
            info!(%tick, units = report.blocked.len(), "units blocked; re-ordering");
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config(path: &Path) -> Result<SimConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SimConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

fn load_terrain(path: Option<&Path>) -> Result<TerrainMap> {
    let map = match path {
        Some(p) => load_terrain_csv(p).with_context(|| format!("loading terrain {}", p.display()))?,
        None => load_terrain_reader(Cursor::new(MAP_CSV))?,
    };
    Ok(map)
}

/// A random cell in the vertical band `[x0, x1)` of the map.
fn cell_in_band(rng: &mut SimRng, x0: i32, x1: i32, height: u32) -> Cell {
    Cell::new(rng.gen_range(x0..x1), rng.gen_range(0..height as i32))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => SimConfig {
            total_ticks: SIM_SECONDS * 30,
            seed:        SEED,
            ..SimConfig::default()
        },
    };
    let terrain_path = args.next();
    let terrain = Arc::new(load_terrain(terrain_path.as_deref().map(Path::new))?);
    info!(config = %serde_json::to_string(&config)?, "starting skirmish");

    let mut sim = SimBuilder::new(config.clone(), Arc::clone(&terrain)).build()?;
    let bounds = sim.grid.bounds();
    let third = bounds.width as i32 / 3;
    info!(
        tiles = %format!("{}x{}", terrain.tiles_w(), terrain.tiles_h()),
        %bounds,
        workers = config.worker_count,
        "terrain loaded"
    );

    // ── Spawn the squad on the western bank ───────────────────────────────
    let mut rng = SimRng::new(config.seed);
    let kinds = [
        (Footprint::Single, 45.0),
        (Footprint::Pair, 30.0),
        (Footprint::square(3)?, 20.0),
    ];
    let mut units = Vec::with_capacity(UNIT_COUNT);
    for _ in 0..SPAWN_ATTEMPTS {
        if units.len() == UNIT_COUNT {
            break;
        }
        let Some((footprint, speed)) = rng.choose(&kinds).cloned() else { break };
        let facing = rng.choose(&Direction::ALL).copied().unwrap_or(Direction::E);
        let anchor = cell_in_band(&mut rng, 0, third, bounds.height);
        if let Ok(id) = sim.spawn(Pose::new(anchor, facing, footprint), speed) {
            units.push(id);
        }
    }
    if units.len() < UNIT_COUNT {
        warn!(spawned = units.len(), wanted = UNIT_COUNT, "western bank too crowded");
    }

    // ── Orders ────────────────────────────────────────────────────────────
    for &unit in &units {
        let goal = cell_in_band(&mut rng, bounds.width as i32 - third, bounds.width as i32, bounds.height);
        sim.set_destination(unit, goal)?;
    }

    // ── Run ───────────────────────────────────────────────────────────────
    let mut observer = SkirmishObserver::default();
    let started = Instant::now();
    let mut cells_moved = 0u64;
    let tps = u64::from(config.ticks_per_second);

    while sim.current_tick() < config.end_tick() {
        let report = sim.tick(&mut observer);
        cells_moved += report.cells_moved;

        for &unit in &report.blocked {
            if let Some(goal) = sim.state(unit)?.goal {
                sim.set_destination(unit, goal)?;
            }
        }
        if report.tick.0 % tps == 0 {
            let states: Vec<_> = units.iter().filter_map(|&u| sim.state(u).ok()).collect();
            let moving = states.iter().filter(|s| !s.is_stationary()).count();
            let steps_left: usize = states.iter().map(|s| s.steps_remaining()).sum();
            info!(
                second = report.tick.0 / tps,
                moving,
                steps_left,
                queued = sim.pool.queued(),
                in_flight = sim.pool.in_flight(),
                "progress"
            );
        }
    }
    let settled = sim.settle(&mut observer);

    // ── Summary ───────────────────────────────────────────────────────────
    let on_east_bank = units
        .iter()
        .filter_map(|&u| sim.pose(u))
        .filter(|p| p.anchor.x >= bounds.width as i32 - third)
        .count();

    println!();
    println!("=== skirmish finished in {:.2?} ===", started.elapsed());
    println!("Units:          {}", units.len());
    println!("Routes:         {} installed, {} failed", observer.routes, observer.failed);
    println!("Arrivals:       {}", observer.arrivals);
    println!("Blocks:         {}", observer.blocks);
    println!("Cells moved:    {cells_moved}");
    println!("Cell changes:   {}", observer.changed_cells);
    println!("Late routes:    {}", settled.paths_installed);
    println!("On east bank:   {on_east_bank}/{}", units.len());
    Ok(())
}
