#![no_main]

//! Fuzz target for cookie decryption.
//!
//! Arbitrary bytes must never panic and never open, and a real cookie with
//! the fuzz input XORed in must only open when the input leaves it unchanged.

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use stateless_retry::crypto::CookieAead;
use stateless_retry::{CookieCipher, CookieState, NamedGroup, SeededRng};

fuzz_target!(|data: &[u8]| {
    let cipher = CookieCipher::new(CookieAead::Aes128Gcm, Arc::new(SeededRng::new(Some(1))));
    cipher.set_secrets(&[&[0x42; 16], &[0x24; 16]]).unwrap();

    assert!(cipher.decrypt(data).is_none());

    let state = CookieState::new(b"token", Some(NamedGroup::X25519));
    let mut cookie = cipher.encrypt(&state).unwrap();
    let changed = data.iter().take(cookie.len()).any(|b| *b != 0);
    for (c, d) in cookie.iter_mut().zip(data) {
        *c ^= d;
    }

    match cipher.decrypt(&cookie) {
        Some(opened) => {
            assert!(!changed);
            assert_eq!(opened, state);
        }
        None => assert!(changed),
    }
});
