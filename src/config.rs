use std::fmt;
use std::sync::Arc;

use crate::crypto::{CookieAead, OsRandom, SecureRandom};
use crate::rng::SeededRng;
use crate::types::{CipherSuite, NamedGroup, ProtocolVersion};
use crate::Error;

const DEFAULT_SUPPORTED_VERSIONS: &[ProtocolVersion] = &[ProtocolVersion::TLS1_3];

const DEFAULT_SUPPORTED_GROUPS: &[NamedGroup] = &[NamedGroup::X25519, NamedGroup::Secp256r1];

const DEFAULT_CIPHER_SUITES: &[CipherSuite] = &[
    CipherSuite::AES_128_GCM_SHA256,
    CipherSuite::AES_256_GCM_SHA384,
    CipherSuite::CHACHA20_POLY1305_SHA256,
];

/// Stateless retry configuration
#[derive(Clone)]
pub struct Config {
    supported_versions: Vec<ProtocolVersion>,
    supported_groups: Vec<NamedGroup>,
    cipher_suites: Vec<CipherSuite>,
    cookie_aead: CookieAead,
    secure_random: Arc<dyn SecureRandom>,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            supported_versions: DEFAULT_SUPPORTED_VERSIONS.to_vec(),
            supported_groups: DEFAULT_SUPPORTED_GROUPS.to_vec(),
            cipher_suites: DEFAULT_CIPHER_SUITES.to_vec(),
            cookie_aead: CookieAead::default(),
            rng_seed: None,
            secure_random: None,
        }
    }

    /// Protocol versions the server accepts, most preferred first.
    #[inline(always)]
    pub fn supported_versions(&self) -> &[ProtocolVersion] {
        &self.supported_versions
    }

    /// Key exchange groups, most preferred first.
    ///
    /// The first of these that the client supports is the one a retry demands.
    #[inline(always)]
    pub fn supported_groups(&self) -> &[NamedGroup] {
        &self.supported_groups
    }

    /// Cipher suites, most preferred first.
    #[inline(always)]
    pub fn cipher_suites(&self) -> &[CipherSuite] {
        &self.cipher_suites
    }

    /// AEAD protecting the cookies.
    #[inline(always)]
    pub fn cookie_aead(&self) -> CookieAead {
        self.cookie_aead
    }

    /// Source of cookie nonces.
    #[inline(always)]
    pub fn secure_random(&self) -> &Arc<dyn SecureRandom> {
        &self.secure_random
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            supported_versions: DEFAULT_SUPPORTED_VERSIONS.to_vec(),
            supported_groups: DEFAULT_SUPPORTED_GROUPS.to_vec(),
            cipher_suites: DEFAULT_CIPHER_SUITES.to_vec(),
            cookie_aead: CookieAead::default(),
            secure_random: Arc::new(OsRandom),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supported_versions", &self.supported_versions)
            .field("supported_groups", &self.supported_groups)
            .field("cipher_suites", &self.cipher_suites)
            .field("cookie_aead", &self.cookie_aead)
            .finish_non_exhaustive()
    }
}

/// Builder for stateless retry configuration.
pub struct ConfigBuilder {
    supported_versions: Vec<ProtocolVersion>,
    supported_groups: Vec<NamedGroup>,
    cipher_suites: Vec<CipherSuite>,
    cookie_aead: CookieAead,
    rng_seed: Option<u64>,
    secure_random: Option<Arc<dyn SecureRandom>>,
}

impl ConfigBuilder {
    /// Set the accepted protocol versions, most preferred first.
    ///
    /// Defaults to TLS 1.3 only.
    pub fn supported_versions(mut self, versions: &[ProtocolVersion]) -> Self {
        self.supported_versions = versions.to_vec();
        self
    }

    /// Set the key exchange groups, most preferred first.
    ///
    /// Defaults to X25519, secp256r1.
    pub fn supported_groups(mut self, groups: &[NamedGroup]) -> Self {
        self.supported_groups = groups.to_vec();
        self
    }

    /// Set the cipher suites, most preferred first.
    ///
    /// Defaults to AES-128-GCM, AES-256-GCM, ChaCha20-Poly1305.
    pub fn cipher_suites(mut self, suites: &[CipherSuite]) -> Self {
        self.cipher_suites = suites.to_vec();
        self
    }

    /// Set the AEAD protecting the cookies.
    ///
    /// Determines the required secret length. Defaults to AES-128-GCM.
    pub fn cookie_aead(mut self, aead: CookieAead) -> Self {
        self.cookie_aead = aead;
        self
    }

    /// Seed a deterministic random source for cookie nonces.
    ///
    /// Only meant for tests. Ignored when [`ConfigBuilder::with_secure_random`] is set.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Set a custom random source for cookie nonces.
    pub fn with_secure_random(mut self, random: Arc<dyn SecureRandom>) -> Self {
        self.secure_random = Some(random);
        self
    }

    /// Build the configuration.
    ///
    /// Returns `Error::Config` if any of the preference lists is empty.
    ///
    /// The random source is selected in the following priority order:
    /// 1. Explicit source set via `with_secure_random()`
    /// 2. Seeded source if `rng_seed()` was given
    /// 3. The operating system CSPRNG
    pub fn build(self) -> Result<Config, Error> {
        if self.supported_versions.is_empty() {
            return Err(Error::Config("no supported versions".to_string()));
        }
        if self.supported_groups.is_empty() {
            return Err(Error::Config("no supported groups".to_string()));
        }
        if self.cipher_suites.is_empty() {
            return Err(Error::Config("no cipher suites".to_string()));
        }

        let secure_random: Arc<dyn SecureRandom> = match (self.secure_random, self.rng_seed) {
            (Some(random), _) => random,
            (None, Some(seed)) => Arc::new(SeededRng::new(Some(seed))),
            (None, None) => Arc::new(OsRandom),
        };

        Ok(Config {
            supported_versions: self.supported_versions,
            supported_groups: self.supported_groups,
            cipher_suites: self.cipher_suites,
            cookie_aead: self.cookie_aead,
            secure_random,
        })
    }
}
