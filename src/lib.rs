//! stateless-retry
//!
//! Stateless HelloRetryRequest handling for TLS 1.3 servers.
//!
//! A server that answers every first ClientHello with a HelloRetryRequest and
//! keeps no per-client state cannot be made to hold memory by spoofed source
//! addresses. Whatever it needs later (an opaque application token and the key
//! exchange group it demanded) is sealed into an AEAD cookie, handed to the
//! client and echoed back in the retried ClientHello.
//!
//! # Goals
//! - **Stateless**: one [`StatelessRetry`] per process, shared behind an `Arc`.
//! - **Rotatable**: cookies are sealed under the newest secret and open under
//!   any installed secret, so keys can be rolled without dropping handshakes.
//! - **Sans-IO**: bytes in, bytes out. Transport and the rest of the handshake
//!   stay with the caller.
//!
//! # Non-goals
//! - Session resumption, 0-RTT or any part of the handshake after the retry
//! - Record protection and the key schedule
//! - Persistent secret storage
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stateless_retry::{Config, RetryOutcome, StatelessRetry};
//!
//! # fn recv() -> Vec<u8> { Vec::new() }
//! # fn send(_: &[u8]) {}
//! let retry = StatelessRetry::new(Arc::new(Config::default()));
//! retry.set_cookie_secrets(&[&[0x42; 16]]).unwrap();
//!
//! let client_hello = recv();
//! match retry.get_token_or_retry(&client_hello, b"client address").unwrap() {
//!     RetryOutcome::StatelessHelloRetryRequest(hrr) => send(&hrr),
//!     RetryOutcome::AppToken(state) => {
//!         // Continue the handshake, the client proved it can receive.
//!         let _ = state.app_token;
//!     }
//! }
//! ```
//!
//! # Cookie secrets
//!
//! [`StatelessRetry::set_cookie_secrets`] replaces the whole set at once. The
//! first secret encrypts. To rotate, install `[new, old]`, then later `[new]`.
//! Cookies issued under a secret that is no longer installed fail with
//! [`Error::InvalidCookie`].

#![forbid(unsafe_code)]
#![warn(clippy::all)]
// #![deny(missing_docs)]

#[macro_use]
extern crate log;

mod buffer;

mod config;
pub use config::{Config, ConfigBuilder};

mod cookie;
pub use cookie::{CookieCipher, CookieState, COOKIE_AAD, MIN_COOKIE_LEN};

pub mod crypto;

mod error;
pub use error::Error;

pub mod message;

mod negotiate;
pub use negotiate::{negotiate_cipher_suite, negotiate_group, negotiate_version};

mod retry;
pub use retry::{RetryOutcome, StatelessRetry};

mod rng;
pub use rng::SeededRng;

mod types;
pub use types::{CipherSuite, ContentType, MessageType, NamedGroup, ProtocolVersion};

pub use buffer::Buf;
