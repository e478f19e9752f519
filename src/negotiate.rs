//! Parameter selection for a HelloRetryRequest.
//!
//! The server's preference order always wins. A retry is only worth sending if
//! the retried ClientHello can succeed, so every selection here fails with
//! [`Error::Negotiation`] when there is no overlap with the client.

use crate::types::{CipherSuite, NamedGroup, ProtocolVersion};
use crate::Error;

/// Select the group to demand from the client.
///
/// The negotiated group is the first of `server_groups` the client lists in
/// supported_groups. Returns `Ok(None)` when the client already sent a key
/// share for it and nothing needs to be demanded.
pub fn negotiate_group(
    server_groups: &[NamedGroup],
    client_groups: &[NamedGroup],
    client_key_shares: &[NamedGroup],
) -> Result<Option<NamedGroup>, Error> {
    let group = server_groups
        .iter()
        .copied()
        .find(|g| client_groups.contains(g))
        .ok_or_else(|| Error::Negotiation("no common group".to_string()))?;

    if client_key_shares.contains(&group) {
        trace!("Client already sent a key share for {}", group);
        Ok(None)
    } else {
        Ok(Some(group))
    }
}

/// Select the protocol version from the client's supported_versions.
pub fn negotiate_version(
    server_versions: &[ProtocolVersion],
    client_versions: &[ProtocolVersion],
) -> Result<ProtocolVersion, Error> {
    server_versions
        .iter()
        .copied()
        .find(|v| client_versions.contains(v))
        .ok_or_else(|| Error::Negotiation("no common protocol version".to_string()))
}

/// Select the cipher suite from the client's offer.
pub fn negotiate_cipher_suite(
    server_suites: &[CipherSuite],
    client_suites: &[CipherSuite],
) -> Result<CipherSuite, Error> {
    server_suites
        .iter()
        .copied()
        .find(|s| client_suites.contains(s))
        .ok_or_else(|| Error::Negotiation("no common cipher suite".to_string()))
}
