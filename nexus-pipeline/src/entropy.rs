//! Injectable entropy source.
//!
//! All simulated outcomes (prospect replies, discovery answers, build
//! results) draw from this trait instead of calling a RNG directly, so
//! stage logic stays deterministic under test and a live deployment can
//! supply real outcomes through the same seam.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Entropy {
    /// Uniform value in [0, 1).
    fn roll(&mut self) -> f64;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.roll() < p
    }

    /// Index into a collection of `len` items.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.roll() * len as f64) as usize).min(len - 1)
    }

    /// Integer in the inclusive range [lo, hi].
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi);
        lo + (self.roll() * (hi - lo + 1) as f64) as u32
    }
}

/// Thread-local RNG. The default for real runs.
#[derive(Debug, Default)]
pub struct ThreadEntropy;

impl Entropy for ThreadEntropy {
    fn roll(&mut self) -> f64 {
        rand::thread_rng().gen()
    }
}

/// Seeded RNG for reproducible runs (`--seed`).
#[derive(Debug)]
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Entropy for SeededEntropy {
    fn roll(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Test double that replays a fixed sequence of rolls, cycling when
/// exhausted.
#[derive(Debug)]
pub struct ScriptedEntropy {
    rolls: Vec<f64>,
    pos: usize,
}

impl ScriptedEntropy {
    pub fn new(rolls: Vec<f64>) -> Self {
        assert!(!rolls.is_empty(), "scripted entropy needs at least one roll");
        Self { rolls, pos: 0 }
    }

    /// Every roll returns the same value.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl Entropy for ScriptedEntropy {
    fn roll(&mut self) -> f64 {
        let value = self.rolls[self.pos % self.rolls.len()];
        self.pos += 1;
        value
    }
}
