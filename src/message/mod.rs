//! TLS 1.3 wire formats used on the retry path.
//!
//! Parsers follow one pattern: variable length data is not copied out but
//! recorded as a `Range<usize>` into the buffer that was parsed, offset by a
//! `base_offset` so ranges stay valid for the root buffer.

mod client_hello;
mod extension;
pub mod extensions;
mod handshake;
mod id;
mod record;
mod server_hello;

pub use client_hello::{ClientHello, ClientHelloMessage};
pub use extension::{Extension, ExtensionType};
pub use extensions::cookie::CookieExtension;
pub use extensions::key_share::{KeyShareClientHello, KeyShareEntry, KeyShareHelloRetryRequest};
pub use extensions::supported_groups::SupportedGroupsExtension;
pub use extensions::supported_versions::{
    SupportedVersionsClientHello, SupportedVersionsServerHello,
};
pub use handshake::{write_handshake, Header, HANDSHAKE_HEADER_LEN};
pub use id::{InvalidLength, Random, SessionId};
pub use record::{
    read_handshake_records, write_records, TlsPlaintext, MAX_FRAGMENT_LEN, RECORD_HEADER_LEN,
};
pub use server_hello::{ServerHello, HRR_RANDOM};
