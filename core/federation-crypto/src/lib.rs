//! Cryptographic primitives for the federation protocol.
//!
//! - [`PrivateKey`] / [`PublicKey`]: RSA keys with PEM import/export
//! - [`signature`]: the canonical `RSA-SHA256` sign/verify primitive
//! - [`cipher`]: one-time AES-256-CBC encryption
//! - [`sealed`]: AES key bundles wrapped with a recipient's RSA key
//! - [`encoding`]: the base64 dialects the wire formats use
//!
//! Nothing here knows about entities or envelopes; those layers compose
//! these functions.

pub mod cipher;
pub mod encoding;
mod error;
mod key;
pub mod sealed;
pub mod signature;

pub use cipher::{AES_IV_SIZE, AES_KEY_SIZE, CipherParams};
pub use error::{CryptoError, CryptoResult};
pub use key::{DEFAULT_KEY_BITS, PrivateKey, PublicKey};
