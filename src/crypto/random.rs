//! Injectable sources of cryptographic randomness.
//!
//! Both the key registry (32-byte DEKs) and the cipher service (16-byte
//! IVs) draw their bytes from an `EntropySource` instead of a hidden
//! global, so tests can swap in a seeded generator and get reproducible
//! fixtures.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// A source of random bytes shared across threads.
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]);
}

/// Production entropy: the `rand` thread-local CSPRNG, seeded from and
/// periodically reseeded by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) {
        rand::rng().fill_bytes(dest);
    }
}

/// Deterministic entropy for tests and fixtures.
///
/// Never use this outside of tests: every instance built from the same
/// seed produces the same IVs and keys.
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&self, dest: &mut [u8]) {
        // RNG state is valid even if another holder panicked.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.fill_bytes(dest);
    }
}
