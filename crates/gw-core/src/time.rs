//! Simulation time model and run configuration.
//!
//! # Design
//!
//! Time advances in fixed `Tick`s at `ticks_per_second` (the frame rate the
//! game drives the core at).  Agent speeds are expressed in cells per second,
//! so one tick adds `speed / ticks_per_second` cells of movement progress.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Frame counter plus the rate that converts it to game seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    pub ticks_per_second: u32,
    pub current_tick:     Tick,
}

impl SimClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self { ticks_per_second, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Game seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 / self.ticks_per_second as f64
    }

    /// Fraction of a cell covered in one tick at `speed` cells/second.
    #[inline]
    pub fn progress_per_tick(&self, speed: f64) -> f64 {
        speed / self.ticks_per_second as f64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration for a movement simulation.
///
/// Typically loaded from a JSON file by the application and handed to
/// `SimBuilder`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Frames per game second.  Default: 30.
    pub ticks_per_second: u32,

    /// Ticks to run when driven by `Sim::run`.
    pub total_ticks: u64,

    /// Number of reusable path workers.  Default: 10.
    pub worker_count: usize,

    /// Threads in the background search pool.  `None` uses `worker_count`.
    pub search_threads: Option<usize>,

    /// Run searches off the tick thread.  When `false` every search runs to
    /// completion inside the call that dispatches it, which makes runs fully
    /// reproducible tick by tick.
    pub background_search: bool,

    /// Abandon a search after expanding this many nodes.  `None` = unbounded.
    pub max_search_expansions: Option<u32>,

    /// Master RNG seed for applications that scatter agents or orders.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            ticks_per_second:      30,
            total_ticks:           30 * 60,
            worker_count:          10,
            search_threads:        None,
            background_search:     true,
            max_search_expansions: None,
            seed:                  0,
        }
    }
}

impl SimConfig {
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.ticks_per_second)
    }

    /// Reject values the tick loop cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.ticks_per_second == 0 {
            return Err(CoreError::Config("ticks_per_second must be > 0".into()));
        }
        if self.worker_count == 0 || self.worker_count > u16::MAX as usize {
            return Err(CoreError::Config(format!(
                "worker_count must be in 1..={}, got {}",
                u16::MAX,
                self.worker_count
            )));
        }
        if self.search_threads == Some(0) {
            return Err(CoreError::Config("search_threads must be > 0".into()));
        }
        Ok(())
    }
}
