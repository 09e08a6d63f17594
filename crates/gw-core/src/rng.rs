//! Deterministic simulation-level RNG.
//!
//! The movement core itself is deterministic and never draws random numbers.
//! `SimRng` is for the layers around it: scattering spawn points, picking
//! move orders in demos and soak tests.  Same seed, same sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{Cell, GridBounds};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// A uniformly random cell inside `bounds`.
    ///
    /// # Panics
    /// Panics if `bounds` has zero area.
    pub fn cell_in(&mut self, bounds: GridBounds) -> Cell {
        Cell::new(
            self.0.gen_range(0..bounds.width as i32),
            self.0.gen_range(0..bounds.height as i32),
        )
    }

    /// Choose a random element from a slice; `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
