use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use stateless_retry::{Config, CookieState, RetryOutcome, StatelessRetry};

use crate::common::*;

#[test]
fn shared_between_threads() {
    let _ = env_logger::try_init();

    let retry = Arc::new(retry());
    let ch = ClientHelloBuilder::default().record();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let retry = Arc::clone(&retry);
            let ch = ch.clone();
            thread::spawn(move || {
                let token = format!("client-{}", i).into_bytes();
                for _ in 0..50 {
                    let hrr = match retry.get_token_or_retry(&ch, &token).unwrap() {
                        RetryOutcome::StatelessHelloRetryRequest(hrr) => hrr,
                        other => panic!("unexpected {:?}", other),
                    };
                    let cookie = parse_hrr(&hrr).cookie();
                    let second = ClientHelloBuilder::default().cookie(&cookie).record();
                    match retry.get_token_or_retry(&second, b"").unwrap() {
                        RetryOutcome::AppToken(state) => assert_eq!(state.app_token, token),
                        other => panic!("unexpected {:?}", other),
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn rotation_while_decrypting() {
    let _ = env_logger::try_init();

    let config = Config::builder().rng_seed(9).build().unwrap();
    let retry = Arc::new(StatelessRetry::new(Arc::new(config)));
    retry.set_cookie_secrets(&[&SECRET_A]).unwrap();

    // A stays installed throughout, so its cookies must always open.
    let state = CookieState::new(b"pinned", None);
    let cookie = retry.cipher().encrypt(&state).unwrap();

    let stop = Arc::new(AtomicBool::new(false));

    let rotator = {
        let retry = Arc::clone(&retry);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut n = 0u32;
            loop {
                let result = if n % 2 == 0 {
                    retry.set_cookie_secrets(&[&SECRET_B, &SECRET_A])
                } else {
                    retry.set_cookie_secrets(&[&SECRET_C, &SECRET_B, &SECRET_A])
                };
                result.unwrap();
                n += 1;
                if stop.load(Ordering::Relaxed) {
                    break n;
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let retry = Arc::clone(&retry);
            let cookie = cookie.clone();
            let state = state.clone();
            thread::spawn(move || {
                for _ in 0..2_000 {
                    assert_eq!(retry.decrypt(&cookie), Some(state.clone()));

                    // A fresh cookie may lose its secret to the next rotation,
                    // but it never opens to anything else.
                    let fresh = retry.cipher().encrypt(&state).unwrap();
                    let opened = retry.decrypt(&fresh);
                    assert!(opened.is_none() || opened == Some(state.clone()));
                }
            })
        })
        .collect();

    for r in readers {
        r.join().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    let rotations = rotator.join().unwrap();
    assert!(rotations > 0);
}
