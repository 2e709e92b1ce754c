//! Random reviewer selection.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::{Mutex, PoisonError};

/// Draws reviewers uniformly at random from a candidate pool.
///
/// The generator is seeded once and shared by all callers; a poisoned lock is
/// recovered rather than propagated.
#[derive(Debug)]
pub struct ReviewerAssigner {
    rng: Mutex<StdRng>,
}

impl ReviewerAssigner {
    /// Creates an assigner seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates an assigner with a fixed seed for reproducible draws.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Returns `min(count, candidates.len())` distinct candidates.
    ///
    /// The full pool is shuffled before truncation, so every subset of the
    /// requested size is equally likely. An empty pool or a zero count yields
    /// an empty selection.
    #[must_use]
    pub fn select_reviewers<T: Clone>(&self, candidates: &[T], count: usize) -> Vec<T> {
        if candidates.is_empty() || count == 0 {
            return Vec::new();
        }

        let mut pool = candidates.to_vec();
        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            pool.shuffle(&mut *rng);
        }
        pool.truncate(count);
        pool
    }
}

impl Default for ReviewerAssigner {
    fn default() -> Self {
        Self::from_entropy()
    }
}
