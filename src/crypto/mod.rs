//! Cryptographic building blocks of the cookie cipher.

mod aead;
mod provider;
mod random;
mod secrets;

pub use aead::{CookieAead, NONCE_LEN, TAG_LEN};
pub use provider::{CryptoSafe, SecureRandom};
pub use random::OsRandom;
pub use secrets::{SecretSet, SecretStore};
