use std::sync::Arc;

use crate::buffer::Buf;
use crate::config::Config;
use crate::cookie::{CookieCipher, CookieState};
use crate::message::{
    write_handshake, write_records, ClientHelloMessage, CookieExtension, Extension, ExtensionType,
    KeyShareHelloRetryRequest, ServerHello, SessionId, SupportedVersionsServerHello,
};
use crate::negotiate::{negotiate_cipher_suite, negotiate_group, negotiate_version};
use crate::types::{CipherSuite, ContentType, MessageType, NamedGroup, ProtocolVersion};
use crate::Error;

/// Largest cookie that still fits the HelloRetryRequest extensions block.
///
/// supported_versions and key_share take 6 bytes each, the cookie extension
/// header and its length prefix another 6.
const MAX_HRR_COOKIE_LEN: usize = u16::MAX as usize - 18;

/// What to do with a ClientHello.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome {
    /// No cookie yet. Send these record bytes to the client and forget it.
    StatelessHelloRetryRequest(Vec<u8>),
    /// The client echoed a valid cookie. This is the state it carried.
    AppToken(CookieState),
}

/// Stateless HelloRetryRequest handling for a TLS 1.3 server.
///
/// All the server needs to remember between the first and the retried
/// ClientHello lives in the cookie, so one instance can be shared behind an
/// `Arc` by any number of connection handlers.
#[derive(Debug)]
pub struct StatelessRetry {
    config: Arc<Config>,
    cipher: CookieCipher,
}

impl StatelessRetry {
    pub fn new(config: Arc<Config>) -> Self {
        let cipher = CookieCipher::new(config.cookie_aead(), config.secure_random().clone());
        StatelessRetry { config, cipher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cipher(&self) -> &CookieCipher {
        &self.cipher
    }

    /// Replace the cookie secrets. The first one encrypts, all of them decrypt.
    pub fn set_cookie_secrets(&self, secrets: &[&[u8]]) -> Result<(), Error> {
        self.cipher.set_secrets(secrets)
    }

    /// Inspect a ClientHello and either demand a retry or recover the token.
    ///
    /// `client_hello` is the raw bytes of one or more plaintext handshake
    /// records holding exactly one ClientHello. `app_token` is only used when
    /// a HelloRetryRequest is produced.
    pub fn get_token_or_retry(
        &self,
        client_hello: &[u8],
        app_token: &[u8],
    ) -> Result<RetryOutcome, Error> {
        let msg = ClientHelloMessage::read(client_hello)?;

        if let Some(cookie) = msg.cookie()? {
            return match self.cipher.decrypt(cookie) {
                Some(state) => {
                    debug!("Valid cookie, group: {:?}", state.group);
                    Ok(RetryOutcome::AppToken(state))
                }
                None => {
                    debug!("Rejecting ClientHello with invalid cookie");
                    Err(Error::InvalidCookie)
                }
            };
        }

        let client_hello = msg.client_hello();

        let client_versions = msg
            .supported_versions()?
            .ok_or_else(|| Error::Negotiation("missing supported_versions".to_string()))?;
        let version = negotiate_version(self.config.supported_versions(), &client_versions.versions)?;

        let cipher_suite =
            negotiate_cipher_suite(self.config.cipher_suites(), &client_hello.cipher_suites)?;

        let client_groups = msg
            .supported_groups()?
            .map(|ext| ext.groups)
            .unwrap_or_default();
        let client_key_shares: Vec<NamedGroup> = msg
            .key_share()?
            .map(|ks| ks.groups().collect())
            .unwrap_or_default();
        let group = negotiate_group(
            self.config.supported_groups(),
            &client_groups,
            &client_key_shares,
        )?;

        let cookie = self.cipher.encrypt(&CookieState::new(app_token, group))?;

        let mut output = Buf::new();
        write_hello_retry_request(
            client_hello.legacy_session_id,
            cipher_suite,
            version,
            group,
            &cookie,
            &mut output,
        )?;

        debug!(
            "Stateless HelloRetryRequest: {}, {:?}, group {:?}, {} byte cookie",
            version,
            cipher_suite,
            group,
            cookie.len()
        );
        Ok(RetryOutcome::StatelessHelloRetryRequest(output.into_vec()))
    }

    /// Open a cookie without going through a ClientHello.
    pub fn decrypt(&self, cookie: &[u8]) -> Option<CookieState> {
        self.cipher.decrypt(cookie)
    }
}

/// Write a HelloRetryRequest (encoded as a ServerHello with magic random) as
/// one or more handshake records.
fn write_hello_retry_request(
    session_id: SessionId,
    cipher_suite: CipherSuite,
    version: ProtocolVersion,
    selected_group: Option<NamedGroup>,
    cookie: &[u8],
    output: &mut Buf,
) -> Result<(), Error> {
    if cookie.len() > MAX_HRR_COOKIE_LEN {
        return Err(Error::Crypto(format!(
            "Cookie too long for HelloRetryRequest: {}",
            cookie.len()
        )));
    }

    // Build extension data into a local buffer
    let mut ext_buf = Buf::new();
    let mut extensions: Vec<Extension> = Vec::with_capacity(3);

    // 1. supported_versions extension
    let sv_start = ext_buf.len();
    SupportedVersionsServerHello {
        selected_version: version,
    }
    .serialize(&mut ext_buf);
    extensions.push(Extension {
        extension_type: ExtensionType::SupportedVersions,
        extension_data_range: sv_start..ext_buf.len(),
    });

    // 2. key_share extension, only when demanding a group
    if let Some(group) = selected_group {
        let ks_start = ext_buf.len();
        KeyShareHelloRetryRequest {
            selected_group: group,
        }
        .serialize(&mut ext_buf);
        extensions.push(Extension {
            extension_type: ExtensionType::KeyShare,
            extension_data_range: ks_start..ext_buf.len(),
        });
    }

    // 3. cookie extension
    let cookie_start = ext_buf.len();
    CookieExtension::serialize_from_bytes(cookie, &mut ext_buf);
    extensions.push(Extension {
        extension_type: ExtensionType::Cookie,
        extension_data_range: cookie_start..ext_buf.len(),
    });

    let server_hello = ServerHello::hello_retry_request(session_id, cipher_suite, extensions);

    let mut handshake = Buf::new();
    write_handshake(MessageType::ServerHello, &mut handshake, |body| {
        server_hello.serialize(&ext_buf, body);
    });

    write_records(ContentType::Handshake, &handshake, output);
    Ok(())
}
