#![no_main]

//! Fuzz target for ClientHello record parsing on the retry path.
//!
//! TLS plaintext record format:
//! - ContentType: 1 byte (22 for handshake)
//! - ProtocolVersion: 2 bytes
//! - Length: 2 bytes
//! - Fragment: variable (up to 2^14 bytes)

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use stateless_retry::{Config, StatelessRetry};

/// Record header length
const RECORD_HEADER_LEN: usize = 5;
/// Maximum plaintext fragment size
const MAX_FRAGMENT_SIZE: usize = 16384;

fuzz_target!(|data: &[u8]| {
    let config = Config::builder().rng_seed(0).build().unwrap();
    let retry = StatelessRetry::new(Arc::new(config));
    retry.set_cookie_secrets(&[&[0x42; 16]]).unwrap();

    // Test the input as-is (even small inputs exercise error paths)
    let _ = retry.get_token_or_retry(data, b"token");

    if !data.is_empty() {
        let frag_len = data.len().min(MAX_FRAGMENT_SIZE);

        // Wrap in a handshake record so the ClientHello parser is reached.
        let mut record = Vec::with_capacity(RECORD_HEADER_LEN + frag_len);
        record.push(22u8);
        record.extend_from_slice(&[0x03, 0x01]);
        record.extend_from_slice(&(frag_len as u16).to_be_bytes());
        record.extend_from_slice(&data[..frag_len]);

        let _ = retry.get_token_or_retry(&record, b"token");
    }
});
