//! Shared test helpers for crypto tests.

#![allow(dead_code)]

use federation_crypto::PrivateKey;
use std::sync::LazyLock;

/// Small keys keep the suite fast; production keys use `DEFAULT_KEY_BITS`.
pub const TEST_KEY_BITS: usize = 1024;

static ALICE: LazyLock<PrivateKey> =
    LazyLock::new(|| PrivateKey::generate(TEST_KEY_BITS).unwrap());
static BOB: LazyLock<PrivateKey> = LazyLock::new(|| PrivateKey::generate(TEST_KEY_BITS).unwrap());

/// A key pair generated once per test binary.
pub fn alice() -> &'static PrivateKey {
    &ALICE
}

/// A second, unrelated key pair.
pub fn bob() -> &'static PrivateKey {
    &BOB
}
