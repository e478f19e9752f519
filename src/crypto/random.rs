//! Secure random number generation backed by the operating system.

use rand::rngs::OsRng;
use rand::RngCore;

use super::SecureRandom;

/// Operating system CSPRNG. This is the default nonce source.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl SecureRandom for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), String> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| format!("OS random source failed: {}", e))
    }
}
