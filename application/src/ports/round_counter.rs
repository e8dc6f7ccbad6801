//! Round counter port
//!
//! Source of randomness for `RandomRounds` policies. Injected into the
//! debate use case so tests can pin or seed the draw.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Draws a round count uniformly from an inclusive range
pub trait RoundCounter: Send + Sync {
    fn draw(&self, min: u32, max: u32) -> u32;
}

/// `rand`-backed counter
pub struct RandomRoundCounter {
    rng: Mutex<StdRng>,
}

impl RandomRoundCounter {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic sequence of draws
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomRoundCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundCounter for RandomRoundCounter {
    fn draw(&self, min: u32, max: u32) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(min..=max)
    }
}

/// Always returns the same count
pub struct FixedRoundCounter(pub u32);

impl RoundCounter for FixedRoundCounter {
    fn draw(&self, _min: u32, _max: u32) -> u32 {
        self.0
    }
}
