//! Transport envelopes for federation entities.
//!
//! - [`MagicEnvelope`]: the signed `<me:env>` wrapper
//! - [`EncryptedMagicEnvelope`]: a magic envelope encrypted for one recipient
//! - [`Slap`] / [`EncryptedSlap`]: the legacy `<diaspora>` wrappers, with a
//!   plaintext or encrypted sender header
//!
//! Unwrapping verifies the envelope signature against the sender's key
//! before the payload is decoded, and decoding in turn verifies relayable
//! and signable entity signatures.

mod encrypted;
mod encrypted_slap;
mod error;
pub mod magic_envelope;
mod slap;

pub use encrypted::EncryptedMagicEnvelope;
pub use encrypted_slap::EncryptedSlap;
pub use error::{EnvelopeError, EnvelopeResult};
pub use magic_envelope::MagicEnvelope;
pub use slap::{PROTOCOL_XMLNS, Slap};
