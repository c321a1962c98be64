//! Patrol PRNG adapter.
//!
//! A `SmallRng` behind [`RandomSource`].  Not cryptographic and not meant
//! to be reproducible across builds: the sequencer reseeds it from the
//! clock when patrolling starts.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::app::ports::RandomSource;

pub struct SmallRngSource {
    rng: SmallRng,
}

impl SmallRngSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for SmallRngSource {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for SmallRngSource {
    fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    fn next_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}
