//! AES-GCM sealing for cookies, using RustCrypto.
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm};

use crate::buffer::Buf;

/// AES-GCM nonce length.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length.
pub const TAG_LEN: usize = 16;

/// AEAD algorithm protecting cookies.
///
/// The algorithm fixes the secret length: every secret handed to
/// [`SecretStore::set_secrets`](crate::crypto::SecretStore::set_secrets) must
/// be exactly [`CookieAead::key_len`] bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookieAead {
    /// AES-128-GCM, 16 byte secrets.
    #[default]
    Aes128Gcm,
    /// AES-256-GCM, 32 byte secrets.
    Aes256Gcm,
}

impl CookieAead {
    pub fn key_len(&self) -> usize {
        match self {
            CookieAead::Aes128Gcm => 16,
            CookieAead::Aes256Gcm => 32,
        }
    }

    pub(crate) fn create_cipher(&self, key: &[u8]) -> Result<AesGcm, String> {
        if key.len() != self.key_len() {
            return Err(format!(
                "Invalid key size for {:?}: expected {}, got {}",
                self,
                self.key_len(),
                key.len()
            ));
        }
        AesGcm::new(key)
    }
}

/// AES-GCM cipher keyed with one cookie secret.
pub(crate) enum AesGcm {
    Aes128(Box<Aes128Gcm>),
    Aes256(Box<Aes256Gcm>),
}

impl std::fmt::Debug for AesGcm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AesGcm::Aes128(_) => f.debug_tuple("AesGcm::Aes128").finish(),
            AesGcm::Aes256(_) => f.debug_tuple("AesGcm::Aes256").finish(),
        }
    }
}

impl AesGcm {
    fn new(key: &[u8]) -> Result<Self, String> {
        match key.len() {
            16 => {
                let cipher = Aes128Gcm::new_from_slice(key)
                    .map_err(|_| "Invalid key size for AES-128-GCM".to_string())?;
                Ok(AesGcm::Aes128(Box::new(cipher)))
            }
            32 => {
                let cipher = Aes256Gcm::new_from_slice(key)
                    .map_err(|_| "Invalid key size for AES-256-GCM".to_string())?;
                Ok(AesGcm::Aes256(Box::new(cipher)))
            }
            _ => Err(format!("Invalid key size for AES-GCM: {}", key.len())),
        }
    }

    /// Encrypt `data` in place and append the tag.
    pub fn seal(&self, data: &mut Buf, aad: &[u8], nonce: &[u8]) -> Result<(), String> {
        if nonce.len() != NONCE_LEN {
            return Err(format!(
                "Invalid nonce length: expected {}, got {}",
                NONCE_LEN,
                nonce.len()
            ));
        }
        let nonce = GenericArray::from_slice(nonce);

        let result = match self {
            AesGcm::Aes128(cipher) => cipher.encrypt_in_place(nonce, aad, data),
            AesGcm::Aes256(cipher) => cipher.encrypt_in_place(nonce, aad, data),
        };
        result.map_err(|_| "AES-GCM encryption failed".to_string())
    }

    /// Verify and decrypt `data` in place, removing the tag.
    ///
    /// On failure the buffer content is unspecified.
    pub fn open(&self, data: &mut Buf, aad: &[u8], nonce: &[u8]) -> Result<(), String> {
        if data.len() < TAG_LEN {
            return Err(format!("Ciphertext too short: {}", data.len()));
        }
        if nonce.len() != NONCE_LEN {
            return Err(format!(
                "Invalid nonce length: expected {}, got {}",
                NONCE_LEN,
                nonce.len()
            ));
        }
        let nonce = GenericArray::from_slice(nonce);

        // decrypt_in_place removes the tag and shortens the buffer
        let result = match self {
            AesGcm::Aes128(cipher) => cipher.decrypt_in_place(nonce, aad, data),
            AesGcm::Aes256(cipher) => cipher.decrypt_in_place(nonce, aad, data),
        };
        result.map_err(|_| "AES-GCM decryption failed".to_string())
    }
}
