//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through GenRng instances derived
//! from the single master seed held by the RngBank.
//!
//! Each stage gets its own stream, and each merchant gets its own
//! stream within a stage, seeded from (master_seed, stage slot, index)
//! for the merchant table and (master_seed, stage slot, merchant id) for
//! the satellite tables.
//! This means:
//!   - Adding a new stage never changes existing stages' streams.
//!   - A merchant's record does not depend on how many draws the
//!     merchants before it consumed, so generation can be partitioned.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const SLOT_MIX: u64 = 0x9e37_79b9_7f4a_7c15;
const INDEX_MIX: u64 = 0xbf58_476d_1ce4_e5b9;
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A named, deterministic RNG for one stage (or one merchant in a stage).
pub struct GenRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl GenRng {
    /// Create an RNG directly from a seed. Prefer `RngBank` outside tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(seed),
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

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.gen_range(0..n)
    }

    /// Uniform float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform integer in [lo, hi], both ends inclusive.
    pub fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        self.inner.gen_range(lo..=hi)
    }

    /// Bernoulli trial: returns true with probability p.
    /// Probabilities above 1.0 always succeed, below 0.0 never do.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sample from a simplified Pareto distribution.
    /// x_min: minimum value, alpha: shape parameter (higher = less skewed).
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        let u = self.next_f64().max(1e-10);
        x_min * u.powf(-1.0 / alpha)
    }

    /// Beta(a, b) for integer shapes, as the a-th smallest of
    /// (a + b - 1) uniforms.
    pub fn beta_int(&mut self, a: u32, b: u32) -> f64 {
        assert!(a >= 1 && b >= 1, "beta shapes must be >= 1");
        let n = (a + b - 1) as usize;
        let mut draws: Vec<f64> = (0..n).map(|_| self.next_f64()).collect();
        draws.sort_by(|x, y| x.total_cmp(y));
        draws[(a - 1) as usize]
    }

    /// Pick one element uniformly. Panics on an empty slice; catalogs
    /// are validated before generation starts.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.next_u64_below(items.len() as u64) as usize;
        &items[idx]
    }

    /// Cumulative-weight draw over `weights`. Returns the last index if
    /// rounding leaves the roll above the total.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        assert!(!weights.is_empty(), "weights must not be empty");
        let total: f64 = weights.iter().sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w;
            if roll < cumulative {
                return i;
            }
        }
        weights.len() - 1
    }

    /// `amount` distinct indices from [0, len), in draw order.
    pub fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.inner, len, amount.min(len)).into_vec()
    }
}

/// Hands out every RNG stream for a single generation run.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// One stream for a whole stage (used where draws are inherently
    /// sequential, e.g. the name generator's used-name set).
    pub fn for_stage(&self, slot: StageSlot) -> GenRng {
        GenRng::from_seed(self.stage_seed(slot)).with_name(slot.name())
    }

    /// Per-merchant stream within a stage.
    pub fn for_merchant(&self, slot: StageSlot, index: usize) -> GenRng {
        let seed = self.stage_seed(slot) ^ (index as u64 + 1).wrapping_mul(INDEX_MIX);
        GenRng::from_seed(seed).with_name(slot.name())
    }

    /// Per-record stream keyed by a stable id. Satellite tables use this so
    /// a merchant's rows do not depend on its position in the slice passed in.
    pub fn for_key(&self, slot: StageSlot, key: &str) -> GenRng {
        let hash = key
            .bytes()
            .fold(FNV_OFFSET, |h, b| (h ^ b as u64).wrapping_mul(FNV_PRIME));
        let seed = self.stage_seed(slot) ^ hash.wrapping_mul(INDEX_MIX);
        GenRng::from_seed(seed).with_name(slot.name())
    }

    fn stage_seed(&self, slot: StageSlot) -> u64 {
        self.master_seed ^ (slot as u64).wrapping_add(1).wrapping_mul(SLOT_MIX)
    }
}

/// Stable stage slot assignments.
/// NEVER reorder or remove entries, only append.
/// Reordering changes every stage's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StageSlot {
    Naming = 0,
    Merchant = 1,
    FeatureUsage = 2,
    Transaction = 3,
    Interaction = 4,
    Loan = 5,
}

impl StageSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::Merchant => "merchant",
            Self::FeatureUsage => "feature_usage",
            Self::Transaction => "transaction",
            Self::Interaction => "interaction",
            Self::Loan => "loan",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_slot_and_index_give_same_stream() {
        let bank = RngBank::new(42);
        let mut a = bank.for_merchant(StageSlot::Merchant, 7);
        let mut b = bank.for_merchant(StageSlot::Merchant, 7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn neighbouring_merchants_get_different_streams() {
        let bank = RngBank::new(42);
        let mut a = bank.for_merchant(StageSlot::Merchant, 0);
        let mut b = bank.for_merchant(StageSlot::Merchant, 1);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn keyed_streams_are_stable_and_distinct() {
        let bank = RngBank::new(42);
        let mut a = bank.for_key(StageSlot::FeatureUsage, "BPM100001");
        let mut b = bank.for_key(StageSlot::FeatureUsage, "BPM100001");
        let mut c = bank.for_key(StageSlot::FeatureUsage, "BPM100002");
        let mut d = bank.for_key(StageSlot::Loan, "BPM100001");
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        let zs: Vec<u64> = (0..8).map(|_| c.next_u64()).collect();
        let ws: Vec<u64> = (0..8).map(|_| d.next_u64()).collect();
        assert_eq!(xs, ys);
        assert_ne!(xs, zs);
        assert_ne!(xs, ws);
    }

    #[test]
    fn beta_2_5_is_skewed_low() {
        let mut rng = GenRng::from_seed(9);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.beta_int(2, 5)).sum::<f64>() / n as f64;
        // Beta(2,5) mean = 2/7
        assert!((mean - 2.0 / 7.0).abs() < 0.01, "mean was {mean}");
    }

    #[test]
    fn weighted_index_respects_weights() {
        let mut rng = GenRng::from_seed(3);
        let mut hits = [0usize; 3];
        for _ in 0..10_000 {
            hits[rng.weighted_index(&[0.2, 0.3, 0.5])] += 1;
        }
        assert!(hits[2] > hits[1] && hits[1] > hits[0], "hits: {hits:?}");
    }

    #[test]
    fn sample_indices_are_distinct_and_bounded() {
        let mut rng = GenRng::from_seed(11);
        for amount in 0..=6 {
            let mut idx = rng.sample_indices(6, amount);
            assert_eq!(idx.len(), amount);
            idx.sort_unstable();
            idx.dedup();
            assert_eq!(idx.len(), amount);
            assert!(idx.iter().all(|&i| i < 6));
        }
    }
}
