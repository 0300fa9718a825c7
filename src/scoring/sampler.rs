use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Source of randomness for top-tier tip sampling.
pub trait TipSampler {
    /// Pick `amount` distinct indices below `len`, in the order drawn.
    /// Returns fewer when `len < amount`.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

/// [`TipSampler`] backed by a `rand` generator.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sampler: the same seed yields the same picks.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TipSampler for RandomSampler {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }
}

/// Always takes the first `amount` items. Handy when order must be fixed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstN;

impl TipSampler for FirstN {
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        (0..amount.min(len)).collect()
    }
}
