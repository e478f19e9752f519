//! Stateless retry integration tests.
//!
//! These tests drive the public API with hand built ClientHello records and
//! check the HelloRetryRequest bytes, cookie recovery, key rotation and
//! sharing between threads.

mod concurrency;
mod orchestrator;
