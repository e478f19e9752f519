//! AEAD protected cookies.
//!
//! A cookie carries a [`CookieState`] through the client between the first and
//! the retried ClientHello. The layout is a compatibility contract: cookies
//! issued by one build must open in the next.
//!
//! Plaintext:
//!
//! ```text
//! u16   token length
//! [u8]  token
//! u8    group present (0 or 1)
//! u16   group            (only when present)
//! ```
//!
//! Wire form:
//!
//! ```text
//! [u8; 12]  nonce
//! [u8]      AES-GCM ciphertext of the plaintext, followed by the 16 byte tag
//! ```
//!
//! The associated data is the fixed [`COOKIE_AAD`] label. The group travels
//! encrypted inside the plaintext.

use std::sync::Arc;

use nom::bytes::complete::take;
use nom::combinator::eof;
use nom::number::complete::{be_u16, be_u8};
use nom::IResult;
use zeroize::Zeroize;

use crate::buffer::Buf;
use crate::crypto::{CookieAead, SecretStore, SecureRandom, NONCE_LEN, TAG_LEN};
use crate::types::NamedGroup;
use crate::Error;

/// Associated data bound to every cookie.
pub const COOKIE_AAD: &[u8] = b"tls13 stateless retry cookie";

/// Smallest possible cookie: nonce and tag around an empty plaintext.
pub const MIN_COOKIE_LEN: usize = NONCE_LEN + TAG_LEN;

/// State moved off the server and into the cookie.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CookieState {
    /// Opaque application token. Only the caller gives it meaning.
    pub app_token: Vec<u8>,
    /// Group the HelloRetryRequest demanded, if it demanded one.
    pub group: Option<NamedGroup>,
}

impl CookieState {
    pub fn new(app_token: &[u8], group: Option<NamedGroup>) -> Self {
        CookieState {
            app_token: app_token.to_vec(),
            group,
        }
    }

    fn serialize(&self, output: &mut Buf) -> Result<(), Error> {
        let token_len = u16::try_from(self.app_token.len()).map_err(|_| {
            Error::Crypto(format!(
                "Application token too long: {}",
                self.app_token.len()
            ))
        })?;

        output.extend_from_slice(&token_len.to_be_bytes());
        output.extend_from_slice(&self.app_token);
        match self.group {
            Some(group) => {
                output.push(1);
                group.serialize(output);
            }
            None => output.push(0),
        }
        Ok(())
    }

    /// Strict decoder: every byte must be accounted for.
    fn parse(input: &[u8]) -> IResult<&[u8], CookieState> {
        let (input, token_len) = be_u16(input)?;
        let (input, token) = take(token_len)(input)?;
        let (input, flag) = be_u8(input)?;
        let (input, group) = match flag {
            0 => (input, None),
            1 => {
                let (input, group) = NamedGroup::parse(input)?;
                (input, Some(group))
            }
            _ => {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Verify,
                )))
            }
        };
        let (input, _) = eof(input)?;

        Ok((
            input,
            CookieState {
                app_token: token.to_vec(),
                group,
            },
        ))
    }
}

/// Encrypts and decrypts cookies under a rotating [`SecretStore`].
#[derive(Debug)]
pub struct CookieCipher {
    secrets: SecretStore,
    rng: Arc<dyn SecureRandom>,
}

impl CookieCipher {
    pub fn new(aead: CookieAead, rng: Arc<dyn SecureRandom>) -> Self {
        CookieCipher {
            secrets: SecretStore::new(aead),
            rng,
        }
    }

    /// Install a new set of secrets. The first one encrypts from now on.
    pub fn set_secrets(&self, secrets: &[&[u8]]) -> Result<(), Error> {
        self.secrets.set_secrets(secrets)
    }

    pub fn secrets(&self) -> &SecretStore {
        &self.secrets
    }

    /// Seal `state` into a cookie under the current secret.
    ///
    /// Every call draws a fresh nonce from the configured random source.
    pub fn encrypt(&self, state: &CookieState) -> Result<Vec<u8>, Error> {
        let Some(set) = self.secrets.snapshot() else {
            return Err(Error::Config("No cookie secrets installed".to_string()));
        };

        let mut nonce = [0u8; NONCE_LEN];
        self.rng.fill(&mut nonce).map_err(Error::Crypto)?;

        let mut data = Buf::with_capacity(state.app_token.len() + 5 + TAG_LEN);
        state.serialize(&mut data)?;
        set.current()
            .cipher()
            .seal(&mut data, COOKIE_AAD, &nonce)
            .map_err(Error::Crypto)?;

        let mut cookie = Vec::with_capacity(NONCE_LEN + data.len());
        cookie.extend_from_slice(&nonce);
        cookie.extend_from_slice(&data);

        trace!("Encrypted cookie of {} bytes", cookie.len());
        Ok(cookie)
    }

    /// Open a cookie, trying every installed secret in order.
    ///
    /// Returns `None` for anything that is not a cookie we issued under a
    /// secret still installed: wrong key, tampering, truncation and
    /// inconsistent plaintext all look the same.
    pub fn decrypt(&self, cookie: &[u8]) -> Option<CookieState> {
        if cookie.len() < MIN_COOKIE_LEN {
            trace!("Cookie too short: {}", cookie.len());
            return None;
        }
        let set = self.secrets.snapshot()?;

        let (nonce, sealed) = cookie.split_at(NONCE_LEN);
        let mut data = Buf::with_capacity(sealed.len());

        for secret in set.iter() {
            data.clear();
            data.extend_from_slice(sealed);
            if secret.cipher().open(&mut data, COOKIE_AAD, nonce).is_err() {
                continue;
            }

            let state = CookieState::parse(&data).ok().map(|(_, s)| s);
            data.zeroize();
            if state.is_none() {
                trace!("Authenticated cookie has inconsistent plaintext");
            }
            return state;
        }

        trace!("Cookie did not open under any of {} secret(s)", set.len());
        None
    }
}
