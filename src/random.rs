//! Deterministic pseudo-random number generation.
//!
//! Every solver owns exactly one [`SeededRng`] and draws all randomness from
//! it in a fixed order, so a given seed reproduces the same placements and
//! fitness trajectories bit for bit.
//!
//! The generator is SplitMix64 (Steele, Lea & Flood, 2014): a single `u64`
//! of state, which makes [`state`](SeededRng::state) /
//! [`set_state`](SeededRng::set_state) exact resumption points. It
//! implements [`rand::RngCore`] and [`rand::SeedableRng`]; all sampling goes
//! through [`rand::Rng`], so operators are generic over `R: Rng` and take a
//! `SeededRng` only at the solver level.
//!
//! The free functions here cover the cases where `rand` would panic on
//! degenerate input (empty float ranges, all-zero weights).

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, RngCore, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Uniform float in `[min, max)`, or `min` when the range is empty.
pub fn uniform<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Index drawn with probability proportional to `weights[i]`.
///
/// Negative weights count as zero. Returns `None` when no weight is positive.
pub fn weighted_index<R: Rng>(weights: &[f64], rng: &mut R) -> Option<usize> {
    WeightedIndex::<f64>::new(weights.iter().map(|w| w.max(0.0)))
        .ok()
        .map(|dist| dist.sample(rng))
}

/// Seeded SplitMix64 generator.
///
/// # Examples
///
/// ```
/// use u_floorplan::random::SeededRng;
///
/// let mut a = SeededRng::new(42);
/// let mut b = SeededRng::new(42);
/// assert_eq!(a.next_f64(), b.next_f64());
///
/// let saved = a.state();
/// let x = a.next_int(1, 6);
/// a.set_state(saved);
/// assert_eq!(a.next_int(1, 6), x);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Creates a generator from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Creates a generator from an optional seed, falling back to a random one.
    ///
    /// Callers that need reproducible runs must pass `Some(seed)`.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::new(rand::random()),
        }
    }

    /// Returns the internal state for later resumption.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Restores a state previously returned by [`state`](Self::state).
    pub fn set_state(&mut self, state: u64) {
        self.state = state;
    }

    fn step(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.random()
    }

    /// Uniform integer in `[min, max]` (inclusive). Returns `min` if `max < min`.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if max > min {
            self.random_range(min..=max)
        } else {
            min
        }
    }

    /// Uniform float in `[min, max)`. Returns `min` for an empty range.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        uniform(self, min, max)
    }

    /// Returns `true` with probability `p`, clamped to `[0, 1]`.
    pub fn next_bool(&mut self, p: f64) -> bool {
        self.random_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffles in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }

    /// Picks a uniformly random element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(self)
    }

    /// See [`weighted_index`].
    pub fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        weighted_index(weights, self)
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
