//! Seedable random number generator for deterministic testing.
//!
//! When a seed is provided via [`ConfigBuilder::rng_seed`](crate::ConfigBuilder::rng_seed),
//! every cookie nonce is drawn from a seeded generator, so the same sequence of
//! calls produces byte-identical HelloRetryRequests. This is useful for testing
//! and debugging. It must never be used in production.

use std::sync::Mutex;

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::crypto::SecureRandom;

/// A random number generator that can be seeded for deterministic behavior.
///
/// When created with a seed, it produces deterministic random values.
/// When created without a seed, it reads from the operating system.
pub struct SeededRng {
    inner: Option<Mutex<StdRng>>,
}

impl SeededRng {
    /// Create a new RNG with an optional seed.
    ///
    /// If `seed` is `Some`, the RNG will produce deterministic values.
    /// If `seed` is `None`, it will use the OS random generator.
    pub fn new(seed: Option<u64>) -> Self {
        let inner = seed.map(|s| Mutex::new(StdRng::seed_from_u64(s)));
        Self { inner }
    }
}

impl SecureRandom for SeededRng {
    fn fill(&self, buf: &mut [u8]) -> Result<(), String> {
        match self.inner.as_ref() {
            Some(rng) => {
                // A panic while holding the lock leaves the generator state intact.
                let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
                rng.fill_bytes(buf);
                Ok(())
            }
            None => OsRng
                .try_fill_bytes(buf)
                .map_err(|e| format!("OS random source failed: {}", e)),
        }
    }
}

impl std::fmt::Debug for SeededRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let is_seeded = self.inner.is_some();
        f.debug_struct("SeededRng")
            .field("seeded", &is_seeded)
            .finish()
    }
}
