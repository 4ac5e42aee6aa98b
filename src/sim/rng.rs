//! Injectable randomness and weighted selection
//!
//! Every random decision in the simulation goes through [`RandomSource`], so a test
//! (or a replay) can substitute a scripted sequence for the PCG generator.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform draws in `[0, 1)`
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Uniform draw in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl RandomSource for Pcg32 {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// Deterministic generator for a session
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceSource {
    draws: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(draws: impl Into<Vec<f32>>) -> Self {
        let draws = draws.into();
        assert!(!draws.is_empty(), "SequenceSource needs at least one draw");
        assert!(
            draws.iter().all(|d| (0.0..1.0).contains(d)),
            "SequenceSource draws must lie in [0, 1): {draws:?}"
        );
        Self { draws, cursor: 0 }
    }

    /// A source that always returns the same draw
    pub fn constant(draw: f32) -> Self {
        Self::new(vec![draw])
    }

    /// How many draws have been consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_f32(&mut self) -> f32 {
        let draw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        draw
    }
}

/// Anything that can take part in a weighted draw
pub trait Weighted {
    fn weight(&self) -> u32;
}

impl<T: Weighted + ?Sized> Weighted for &T {
    fn weight(&self) -> u32 {
        (**self).weight()
    }
}

/// Sum of all candidate weights
pub fn total_weight<T: Weighted>(items: &[T]) -> u32 {
    items.iter().map(|item| item.weight()).sum()
}

/// Cumulative-weight selection for a draw already scaled to `[0, total)`.
///
/// Candidates are walked in slice order and `draw` is reduced by each weight; the
/// first candidate that takes it below zero wins. A draw past the end (float
/// rounding) lands on the last candidate with a non-zero weight.
///
/// # Panics
/// If `items` is empty or every weight is zero.
pub fn select_by_draw<T: Weighted>(items: &[T], draw: f32) -> &T {
    assert!(!items.is_empty(), "weighted selection over an empty set");
    assert!(
        total_weight(items) > 0,
        "weighted selection over a set whose weights sum to zero"
    );

    let mut remainder = draw;
    for item in items {
        remainder -= item.weight() as f32;
        if remainder < 0.0 {
            return item;
        }
    }

    // The asserts above guarantee a non-zero weight exists
    let mut last = &items[0];
    for item in items {
        if item.weight() > 0 {
            last = item;
        }
    }
    last
}

/// Draw one candidate proportionally to its weight
pub fn pick_weighted<'a, T: Weighted>(items: &'a [T], rng: &mut impl RandomSource) -> &'a T {
    let total = total_weight(items);
    select_by_draw(items, rng.next_f32() * total as f32)
}
