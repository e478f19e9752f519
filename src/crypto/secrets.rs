//! Cookie secrets and their rotation.
//!
//! The store holds an immutable [`SecretSet`] behind an `Arc`. Rotation builds
//! a complete new set and swaps the pointer, so a decrypt that already took a
//! snapshot keeps working against the set it started with.

use std::sync::{Arc, RwLock};

use zeroize::Zeroizing;

use super::aead::{AesGcm, CookieAead};
use crate::Error;

/// One cookie secret and the cipher keyed with it.
pub(crate) struct Secret {
    // Kept so the raw key is wiped when the set is dropped.
    _key: Zeroizing<Vec<u8>>,
    cipher: AesGcm,
}

impl Secret {
    fn new(aead: CookieAead, key: &[u8]) -> Result<Self, Error> {
        let cipher = aead.create_cipher(key).map_err(Error::Config)?;
        Ok(Secret {
            _key: Zeroizing::new(key.to_vec()),
            cipher,
        })
    }

    pub fn cipher(&self) -> &AesGcm {
        &self.cipher
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// An ordered, immutable set of cookie secrets.
///
/// The first secret encrypts. Every secret may decrypt.
#[derive(Debug)]
pub struct SecretSet {
    secrets: Vec<Secret>,
}

impl SecretSet {
    pub(crate) fn current(&self) -> &Secret {
        // Construction guarantees at least one secret.
        &self.secrets[0]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Secret> {
        self.secrets.iter()
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

/// Holder of the active [`SecretSet`].
#[derive(Debug)]
pub struct SecretStore {
    aead: CookieAead,
    active: RwLock<Option<Arc<SecretSet>>>,
}

impl SecretStore {
    pub fn new(aead: CookieAead) -> Self {
        SecretStore {
            aead,
            active: RwLock::new(None),
        }
    }

    pub fn aead(&self) -> CookieAead {
        self.aead
    }

    /// Replace the active secrets.
    ///
    /// The first secret becomes the encryption secret. Fails without touching
    /// the current set when `secrets` is empty or a secret has the wrong length
    /// for the configured AEAD.
    pub fn set_secrets(&self, secrets: &[&[u8]]) -> Result<(), Error> {
        if secrets.is_empty() {
            return Err(Error::Config("No cookie secrets given".to_string()));
        }

        let set = secrets
            .iter()
            .map(|key| Secret::new(self.aead, key))
            .collect::<Result<Vec<_>, _>>()?;

        let set = Arc::new(SecretSet { secrets: set });
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = Some(set);

        debug!("Installed {} cookie secret(s)", secrets.len());
        Ok(())
    }

    /// The set every operation of one call should use.
    pub fn snapshot(&self) -> Option<Arc<SecretSet>> {
        self.active
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
