//! Deterministic randomness for the simulator.
//!
//! A single seeded source drives every random draw in a run (participant
//! selection, peer sampling, transaction contents, initial colors) so that
//! a full run is reproducible bit-exactly from its seed, per the ordering
//! guarantees in the design notes.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng as _, SeedableRng};

/// Wraps a seeded PRNG and exposes the handful of draws the protocols need,
/// in a fixed order, so two runs with the same seed behave identically.
pub struct Rng {
    inner: StdRng,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng { inner: StdRng::seed_from_u64(seed) }
    }

    /// A fresh 64-bit identifier (transaction / block id). Collisions are
    /// astronomically unlikely and treated as a fatal invariant violation
    /// by callers, never handled here.
    pub fn next_id(&mut self) -> u64 {
        self.inner.gen()
    }

    /// `true` with probability `p`, used for the per-tick transaction spawn
    /// decision.
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen::<f64>() < p
    }

    /// The initial color for a Snowball participant: `true` with
    /// probability `1 - balance`, matching the original's
    /// `random.uniform(0, 1) > balance`.
    pub fn initial_color(&mut self, balance: f64) -> bool {
        self.inner.gen::<f64>() > balance
    }

    /// Picks a uniformly random index from `0..len`. Panics if `len == 0`.
    pub fn pick_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "pick_index called on an empty population");
        self.inner.gen_range(0, len)
    }

    /// Samples `k` distinct values from `[0, n) \ {exclude}` without
    /// replacement, order irrelevant to callers. A configuration error
    /// (`k` too large for the remaining population) is fatal at the call
    /// site, not handled here: it indicates `k >= honest_count` slipped
    /// past startup validation.
    pub fn sample(&mut self, n: usize, k: usize, exclude: usize) -> Vec<usize> {
        let mut population: Vec<usize> = (0..n).filter(|&i| i != exclude).collect();
        assert!(
            k <= population.len(),
            "cannot sample {} distinct values from a population of {}",
            k,
            population.len()
        );
        population.shuffle(&mut self.inner);
        population.truncate(k);
        population
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sample_is_distinct_and_excludes_self() {
        let mut rng = Rng::new(7);
        let picked = rng.sample(10, 5, 3);
        assert_eq!(picked.len(), 5);
        assert!(!picked.contains(&3));
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), picked.len());
    }

    #[test]
    fn same_seed_is_reproducible() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..20 {
            assert_eq!(a.next_id(), b.next_id());
        }
    }

    #[test]
    #[should_panic]
    fn sample_panics_when_k_too_large() {
        let mut rng = Rng::new(1);
        let _ = rng.sample(4, 4, 0);
    }
}
