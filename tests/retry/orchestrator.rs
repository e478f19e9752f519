use std::sync::Arc;
use std::time::{Duration, Instant};

use hex_literal::hex;
use stateless_retry::{Config, CookieState, Error, NamedGroup, RetryOutcome, StatelessRetry};

use crate::common::*;

/// Record, handshake and ServerHello up to the cookie nonce, for token "test".
const RETRY_PREFIX: [u8; 61] = hex!(
    "
    16030300 5b
    02000057 0303
    cf21ad74e59a6111be1d8c021e65b891 c2a211167abb8c5e079e09e2c8a8339c
    00 1301 00
    002f 002b00020304 002c00250023
    "
);

/// Same, when secp256r1 is demanded.
const RETRY_GROUP_PREFIX: [u8; 67] = hex!(
    "
    16030300 63
    0200005f 0303
    cf21ad74e59a6111be1d8c021e65b891 c2a211167abb8c5e079e09e2c8a8339c
    00 1301 00
    0037 002b00020304 003300020017 002c00270025
    "
);

fn expect_retry(outcome: RetryOutcome) -> Vec<u8> {
    match outcome {
        RetryOutcome::StatelessHelloRetryRequest(hrr) => hrr,
        other => panic!("expected retry, got {:?}", other),
    }
}

fn expect_token(outcome: RetryOutcome) -> CookieState {
    match outcome {
        RetryOutcome::AppToken(state) => state,
        other => panic!("expected token, got {:?}", other),
    }
}

#[test]
fn retry_without_group() {
    let _ = env_logger::try_init();

    let retry = retry();
    let hrr = expect_retry(
        retry
            .get_token_or_retry(&ClientHelloBuilder::default().record(), b"test")
            .unwrap(),
    );

    assert_eq!(hrr.len(), RETRY_PREFIX.len() + 12 + 7 + 16);
    assert_eq!(&hrr[..RETRY_PREFIX.len()], &RETRY_PREFIX);
    assert_eq!(&hrr[RETRY_PREFIX.len()..RETRY_PREFIX.len() + 12], &[0x44; 12]);

    let cookie = parse_hrr(&hrr).cookie();
    assert_eq!(
        retry.decrypt(&cookie),
        Some(CookieState::new(b"test", None))
    );
}

#[test]
fn retry_with_group() {
    let _ = env_logger::try_init();

    let retry = retry_with_groups(&[NamedGroup::Secp256r1]);
    let hrr = expect_retry(
        retry
            .get_token_or_retry(&ClientHelloBuilder::default().record(), b"test")
            .unwrap(),
    );

    assert_eq!(hrr.len(), RETRY_GROUP_PREFIX.len() + 12 + 9 + 16);
    assert_eq!(&hrr[..RETRY_GROUP_PREFIX.len()], &RETRY_GROUP_PREFIX);

    let cookie = parse_hrr(&hrr).cookie();
    assert_eq!(
        retry.decrypt(&cookie),
        Some(CookieState::new(b"test", Some(NamedGroup::Secp256r1)))
    );
}

#[test]
fn token_from_echoed_cookie() {
    let _ = env_logger::try_init();

    let retry = retry_with_groups(&[NamedGroup::Secp256r1]);
    let hrr = expect_retry(
        retry
            .get_token_or_retry(&ClientHelloBuilder::default().record(), b"test")
            .unwrap(),
    );
    let cookie = parse_hrr(&hrr).cookie();

    // The retried ClientHello carries the demanded share and the cookie.
    let second = ClientHelloBuilder::default()
        .key_shares(&[0x0017])
        .cookie(&cookie)
        .record();
    let state = expect_token(retry.get_token_or_retry(&second, b"xx").unwrap());

    assert_eq!(state.app_token, b"test");
    assert_eq!(state.group, Some(NamedGroup::Secp256r1));
}

#[test]
fn cookie_wins_over_negotiation() {
    let retry = retry();
    let cookie = retry
        .cipher()
        .encrypt(&CookieState::new(b"test", None))
        .unwrap();

    // Nothing in this ClientHello would negotiate, the cookie alone decides.
    let ch = ClientHelloBuilder::default()
        .without(EXT_SUPPORTED_VERSIONS)
        .without(EXT_SUPPORTED_GROUPS)
        .cookie(&cookie)
        .record();
    let state = expect_token(retry.get_token_or_retry(&ch, b"other").unwrap());
    assert_eq!(state.app_token, b"test");
}

#[test]
fn invalid_cookie() {
    let retry = retry();
    let ch = ClientHelloBuilder::default().cookie(&[0x55; 40]).record();
    assert_eq!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::InvalidCookie)
    );
}

#[test]
fn cookie_from_other_server() {
    let other = retry();
    let cookie = other
        .cipher()
        .encrypt(&CookieState::new(b"test", None))
        .unwrap();

    let retry = retry();
    retry.set_cookie_secrets(&[&SECRET_B]).unwrap();

    let ch = ClientHelloBuilder::default().cookie(&cookie).record();
    assert_eq!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::InvalidCookie)
    );
}

#[test]
fn junk() {
    let retry = retry();
    assert!(matches!(
        retry.get_token_or_retry(b"junk", b"test"),
        Err(Error::Malformed(_))
    ));
    assert!(matches!(
        retry.get_token_or_retry(&[], b"test"),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn partial() {
    let retry = retry();
    let cookie = retry
        .cipher()
        .encrypt(&CookieState::new(b"test", None))
        .unwrap();

    let mut trimmed = ClientHelloBuilder::default().cookie(&cookie).record();
    trimmed.pop();

    assert!(matches!(
        retry.get_token_or_retry(&trimmed, b"test"),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn handshake_split_across_records() {
    let retry = retry();
    let single = expect_retry(
        retry
            .get_token_or_retry(&ClientHelloBuilder::default().record(), b"test")
            .unwrap(),
    );

    for fragment_len in [1, 7, 64] {
        let records = ClientHelloBuilder::default().records(fragment_len);
        let hrr = expect_retry(retry.get_token_or_retry(&records, b"test").unwrap());
        assert_eq!(hrr, single);
    }
}

#[test]
fn non_handshake_record() {
    let retry = retry();
    let mut record = ClientHelloBuilder::default().record();
    record[0] = 0x17;
    assert!(matches!(
        retry.get_token_or_retry(&record, b"test"),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn trailing_record() {
    let retry = retry();
    let mut records = ClientHelloBuilder::default().record();
    records.extend_from_slice(&[0x16, 0x03, 0x03, 0x00, 0x01, 0x00]);
    assert!(matches!(
        retry.get_token_or_retry(&records, b"test"),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn duplicate_extension() {
    let retry = retry();
    let mut ch = ClientHelloBuilder::default();
    ch.extensions.push((EXT_SUPPORTED_VERSIONS, vec![0x02, 0x03, 0x04]));
    assert!(matches!(
        retry.get_token_or_retry(&ch.record(), b"test"),
        Err(Error::Malformed(_))
    ));
}

/// Fill the extensions block up to its 65535 byte limit with empty extensions
/// of distinct unknown types.
fn full_extensions_block() -> ClientHelloBuilder {
    let mut ch = ClientHelloBuilder::default();
    let used: usize = ch.extensions.iter().map(|(_, d)| 4 + d.len()).sum();
    let filler = (0xFFFF - used) / 4;
    ch.extensions
        .extend((0..filler as u16).map(|i| (0x1000 + i, Vec::new())));
    ch
}

#[test]
fn full_extensions_block_is_linear() {
    let _ = env_logger::try_init();

    let retry = retry();
    let ch = full_extensions_block();
    assert!(ch.extensions.len() > 16_000);
    let records = ch.records(16_384);

    let start = Instant::now();
    for _ in 0..5 {
        expect_retry(retry.get_token_or_retry(&records, b"test").unwrap());
    }
    let elapsed = start.elapsed();
    assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
}

#[test]
fn full_extensions_block_with_late_duplicate() {
    let retry = retry();
    let mut ch = full_extensions_block();
    ch.extensions.pop();
    ch.extensions.push((0x1000, Vec::new()));
    let records = ch.records(16_384);

    let start = Instant::now();
    for _ in 0..5 {
        assert!(matches!(
            retry.get_token_or_retry(&records, b"test"),
            Err(Error::Malformed(_))
        ));
    }
    let elapsed = start.elapsed();
    assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);
}

#[test]
fn deterministic_with_fixed_random() {
    let a = retry();
    let b = retry();
    let ch = ClientHelloBuilder::default().record();

    let hrr_a = expect_retry(a.get_token_or_retry(&ch, b"test").unwrap());
    let hrr_b = expect_retry(b.get_token_or_retry(&ch, b"test").unwrap());
    assert_eq!(hrr_a, hrr_b);

    // Same nonce every time means same bytes every time.
    let again = expect_retry(a.get_token_or_retry(&ch, b"test").unwrap());
    assert_eq!(hrr_a, again);
}

#[test]
fn seeded_random_is_reproducible() {
    let make = || {
        let config = Config::builder().rng_seed(42).build().unwrap();
        let retry = StatelessRetry::new(Arc::new(config));
        retry.set_cookie_secrets(&[&SECRET_A]).unwrap();
        retry
    };
    let ch = ClientHelloBuilder::default().record();

    let a = expect_retry(make().get_token_or_retry(&ch, b"test").unwrap());
    let b = expect_retry(make().get_token_or_retry(&ch, b"test").unwrap());
    assert_eq!(a, b);
}

#[test]
fn default_random_varies() {
    let retry = StatelessRetry::new(Arc::new(Config::default()));
    retry.set_cookie_secrets(&[&SECRET_A]).unwrap();
    let ch = ClientHelloBuilder::default().record();

    let a = expect_retry(retry.get_token_or_retry(&ch, b"test").unwrap());
    let b = expect_retry(retry.get_token_or_retry(&ch, b"test").unwrap());
    assert_ne!(a, b);
    assert_eq!(a.len(), b.len());
}

#[test]
fn session_id_is_echoed() {
    let retry = retry();
    let ch = ClientHelloBuilder::default()
        .session_id(&[0x11; 32])
        .record();
    let hrr = parse_hrr(&expect_retry(retry.get_token_or_retry(&ch, b"test").unwrap()));
    assert_eq!(hrr.session_id, vec![0x11; 32]);
}

#[test]
fn server_cipher_suite_preference() {
    let retry = retry();
    let ch = ClientHelloBuilder::default()
        .cipher_suites(&[0x1303, 0x1302])
        .record();
    let hrr = parse_hrr(&expect_retry(retry.get_token_or_retry(&ch, b"test").unwrap()));
    assert_eq!(hrr.cipher_suite, 0x1302);
}

#[test]
fn hello_retry_request_extension_order() {
    let retry = retry_with_groups(&[NamedGroup::Secp256r1]);
    let hrr = parse_hrr(&expect_retry(
        retry
            .get_token_or_retry(&ClientHelloBuilder::default().record(), b"test")
            .unwrap(),
    ));
    let types: Vec<u16> = hrr.extensions.iter().map(|(t, _)| *t).collect();
    assert_eq!(types, vec![EXT_SUPPORTED_VERSIONS, EXT_KEY_SHARE, EXT_COOKIE]);
    assert_eq!(hrr.extension(EXT_KEY_SHARE), Some(&[0x00, 0x17][..]));
}

#[test]
fn client_without_key_shares() {
    let retry = retry();
    let ch = ClientHelloBuilder::default().without(EXT_KEY_SHARE).record();
    let hrr = parse_hrr(&expect_retry(retry.get_token_or_retry(&ch, b"test").unwrap()));
    assert_eq!(hrr.extension(EXT_KEY_SHARE), Some(&[0x00, 0x1D][..]));
    assert_eq!(
        retry.decrypt(&hrr.cookie()).and_then(|s| s.group),
        Some(NamedGroup::X25519)
    );
}

#[test]
fn no_supported_versions() {
    let retry = retry();
    let ch = ClientHelloBuilder::default()
        .without(EXT_SUPPORTED_VERSIONS)
        .record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::Negotiation(_))
    ));
}

#[test]
fn tls12_only_client() {
    let retry = retry();
    let ch = ClientHelloBuilder::default()
        .supported_versions(&[0x0303])
        .record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::Negotiation(_))
    ));
}

#[test]
fn no_common_group() {
    let retry = retry_with_groups(&[NamedGroup::Secp384r1]);
    let ch = ClientHelloBuilder::default().record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::Negotiation(_))
    ));

    let ch = ClientHelloBuilder::default()
        .without(EXT_SUPPORTED_GROUPS)
        .record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::Negotiation(_))
    ));
}

#[test]
fn no_common_cipher_suite() {
    let retry = retry();
    let ch = ClientHelloBuilder::default()
        .cipher_suites(&[0xC02F])
        .record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::Negotiation(_))
    ));
}

#[test]
fn no_secrets_installed() {
    let retry = StatelessRetry::new(Arc::new(Config::default()));
    let ch = ClientHelloBuilder::default().record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::Config(_))
    ));
}

#[test]
fn broken_random_source() {
    let config = Config::builder()
        .with_secure_random(Arc::new(BrokenRandom))
        .build()
        .unwrap();
    let retry = StatelessRetry::new(Arc::new(config));
    retry.set_cookie_secrets(&[&SECRET_A]).unwrap();

    let ch = ClientHelloBuilder::default().record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, b"test"),
        Err(Error::Crypto(_))
    ));
}

#[test]
fn empty_app_token() {
    let retry = retry();
    let hrr = parse_hrr(&expect_retry(
        retry
            .get_token_or_retry(&ClientHelloBuilder::default().record(), b"")
            .unwrap(),
    ));
    assert_eq!(retry.decrypt(&hrr.cookie()), Some(CookieState::default()));
}

#[test]
fn large_app_token_spans_records() {
    let retry = retry();
    let token = vec![0x7E; 20_000];
    let hrr = expect_retry(
        retry
            .get_token_or_retry(&ClientHelloBuilder::default().record(), &token)
            .unwrap(),
    );

    // More than one record is needed for the HelloRetryRequest.
    let first_len = u16::from_be_bytes([hrr[3], hrr[4]]) as usize;
    assert_eq!(first_len, 16_384);

    let parsed = parse_hrr(&hrr);
    assert_eq!(
        retry.decrypt(&parsed.cookie()).map(|s| s.app_token),
        Some(token)
    );
}

#[test]
fn oversized_app_token() {
    let retry = retry();
    let ch = ClientHelloBuilder::default().record();
    assert!(matches!(
        retry.get_token_or_retry(&ch, &vec![0; 65_510]),
        Err(Error::Crypto(_))
    ));
}
