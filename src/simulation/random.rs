//! Random decision points
//!
//! Turn choice, stop-sign waits and reset placement all draw through
//! [`RandomSource`] so scenarios can pin outcomes.

use rand::rngs::StdRng;
use rand::Rng;

/// Source of uniform random numbers for the simulation
pub trait RandomSource {
    /// A uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// A uniform value in `[low, high)`
    fn range(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_unit()
    }

    /// A uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len - 1)
    }

    /// `true` with probability `chance`
    fn chance(&mut self, chance: f32) -> bool {
        self.next_unit() < chance
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
///
/// An empty list always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct FixedSequence {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always yields the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSequence {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
