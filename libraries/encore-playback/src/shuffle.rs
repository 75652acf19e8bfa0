//! Shuffle selection
//!
//! Shuffle never reorders the queue; it only decides which queue entry
//! `next` takes. Each pick is uniform over the current queue.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random index picker
#[derive(Debug, Clone)]
pub struct ShufflePicker {
    rng: StdRng,
}

impl ShufflePicker {
    /// Create a picker, reproducible when a seed is given
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Pick an index in `0..len`, or `None` for an empty range
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }
}

impl Default for ShufflePicker {
    fn default() -> Self {
        Self::new(None)
    }
}
