//! Pluggable randomness for the cookie cipher.
//!
//! Every cookie consumes a fresh nonce. Where those bytes come from is a
//! capability handed to the cipher at construction time through
//! [`Config`](crate::Config), never a process-wide global. Production
//! deployments use [`OsRandom`](crate::crypto::OsRandom); tests plug in a
//! [`SeededRng`](crate::SeededRng) or their own fixed source to reproduce
//! wire bytes exactly.
//!
//! # Implementing a Custom Source
//!
//! ```
//! use stateless_retry::crypto::SecureRandom;
//!
//! #[derive(Debug)]
//! struct Constant(u8);
//!
//! impl SecureRandom for Constant {
//!     fn fill(&self, buf: &mut [u8]) -> Result<(), String> {
//!         buf.fill(self.0);
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Thread Safety
//!
//! Sources are shared between every handshake that goes through a
//! [`StatelessRetry`](crate::StatelessRetry), so they must be
//! `Send + Sync + UnwindSafe + RefUnwindSafe`.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};

/// Marker trait for types that are safe to share as crypto components.
///
/// This trait combines the common bounds required for trait objects held by
/// the cipher:
/// - [`Send`] + [`Sync`]: Thread-safe
/// - [`Debug`]: Support debugging
/// - [`UnwindSafe`] + [`RefUnwindSafe`]: Panic-safe
///
/// This trait is automatically implemented for all types that satisfy these bounds.
pub trait CryptoSafe: Send + Sync + Debug + UnwindSafe + RefUnwindSafe {}

/// Blanket implementation: any type satisfying the bounds implements [`CryptoSafe`].
impl<T: Send + Sync + Debug + UnwindSafe + RefUnwindSafe> CryptoSafe for T {}

/// Secure random number generator.
pub trait SecureRandom: CryptoSafe {
    /// Fill buffer with cryptographically secure random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), String>;
}
