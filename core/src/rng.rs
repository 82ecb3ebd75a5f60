//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through StreamRng instances derived from the
//! single master seed of the run.
//!
//! Each component gets its own RNG stream, seeded deterministically
//! from (master_seed XOR stream_index). This means:
//!   - Adding a new component never changes existing components' streams.
//!   - Each component's stream is fully reproducible in isolation.

use rand::SeedableRng;
use rand_distr::{Distribution, LogNormal};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single generator component.
pub struct StreamRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl StreamRng {
    /// Create a stream RNG from the master seed and a stable stream
    /// index. The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Roll a float uniformly in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        debug_assert!(lo <= hi, "uniform range reversed");
        lo + (hi - lo) * self.next_f64()
    }

    /// Roll an integer uniformly in [lo, hi] (inclusive).
    pub fn int_between(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "int_between range reversed");
        lo + self.next_u64_below((hi - lo + 1) as u64) as i64
    }

    /// Sample from a log-normal distribution with the given underlying
    /// normal mean and standard deviation.
    pub fn log_normal(&mut self, mean: f64, sigma: f64) -> f64 {
        let dist =
            LogNormal::new(mean, sigma).unwrap_or_else(|_| LogNormal::new(0.0, 1.0).unwrap());
        dist.sample(&mut self.inner)
    }

    /// Pick one element uniformly. Returns None on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_u64_below(items.len() as u64) as usize;
        Some(&items[idx])
    }

    /// Pick one element proportionally to its weight.
    ///
    /// This is the single weighted-sampling primitive behind every
    /// "choose with probability weights" site: time-of-day bands,
    /// occupation tables, pattern mix selection. Weights need not sum
    /// to 1.0; they must be non-negative with a positive total.
    pub fn weighted_pick<'a, T>(&mut self, pairs: &'a [(T, f64)]) -> &'a T {
        let total: f64 = pairs.iter().map(|(_, w)| w).sum();
        assert!(total > 0.0, "weighted_pick needs a positive total weight");
        let mut roll = self.next_f64() * total;
        for (value, weight) in pairs {
            roll -= weight;
            if roll < 0.0 {
                return value;
            }
        }
        // Floating-point edge: fall back to the last entry.
        &pairs[pairs.len() - 1].0
    }

    /// Draw k distinct indices from [0, n) via partial Fisher-Yates.
    pub fn sample_distinct(&mut self, n: usize, k: usize) -> Vec<usize> {
        assert!(k <= n, "cannot draw {k} distinct indices from {n}");
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = i + self.next_u64_below((n - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }
}

/// All stream RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_stream(&self, slot: StreamSlot) -> StreamRng {
        StreamRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every component's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Population = 0,
    Registry = 1,
    Patterns = 2,
    Structuring = 3,
    // Add new components here — append only.
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Population => "population",
            Self::Registry => "registry",
            Self::Patterns => "patterns",
            Self::Structuring => "structuring",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_reproducible() {
        let bank_a = RngBank::new(42);
        let bank_b = RngBank::new(42);
        let mut rng_a = bank_a.for_stream(StreamSlot::Patterns);
        let mut rng_b = bank_b.for_stream(StreamSlot::Patterns);
        for _ in 0..100 {
            assert_eq!(rng_a.next_f64(), rng_b.next_f64());
        }
    }

    #[test]
    fn streams_are_independent() {
        let bank = RngBank::new(42);
        let mut rng_a = bank.for_stream(StreamSlot::Patterns);
        let mut rng_b = bank.for_stream(StreamSlot::Structuring);
        let a: Vec<u64> = (0..8).map(|_| rng_a.next_u64_below(1000)).collect();
        let b: Vec<u64> = (0..8).map(|_| rng_b.next_u64_below(1000)).collect();
        assert_ne!(a, b, "distinct slots must yield distinct streams");
    }

    #[test]
    fn int_between_is_inclusive() {
        let mut rng = StreamRng::new(7, 0);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..1000 {
            let v = rng.int_between(28, 31);
            assert!((28..=31).contains(&v));
            seen_lo |= v == 28;
            seen_hi |= v == 31;
        }
        assert!(seen_lo && seen_hi);
    }

    #[test]
    fn weighted_pick_respects_weights() {
        let mut rng = StreamRng::new(9, 0);
        let pairs = [("common", 9.0), ("rare", 1.0)];
        let mut common = 0u32;
        for _ in 0..2000 {
            if *rng.weighted_pick(&pairs) == "common" {
                common += 1;
            }
        }
        // Expect roughly 90%; allow a generous band.
        assert!(common > 1600, "common picked only {common}/2000 times");
    }

    #[test]
    fn sample_distinct_has_no_duplicates() {
        let mut rng = StreamRng::new(3, 0);
        let idxs = rng.sample_distinct(10, 7);
        assert_eq!(idxs.len(), 7);
        let mut sorted = idxs.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 7);
    }
}
