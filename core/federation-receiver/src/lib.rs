//! Receive dispatch for federation payloads.
//!
//! [`receive_public`] and [`receive_private`] take the raw request body,
//! unwrap and verify it with the envelope layer, then run the matching
//! receiver. `legacy` selects the `<diaspora>` Slap formats instead of the
//! magic envelope formats.

mod error;
mod receiver;

use federation_codec::Codec;
use federation_crypto::PrivateKey;
use federation_model::FederationHost;
use federation_salmon::{EncryptedMagicEnvelope, EncryptedSlap, MagicEnvelope, Slap};

pub use error::{ReceiveError, ReceiveResult};
pub use receiver::{PrivateReceiver, PublicReceiver};

/// Receives a body posted to the public inbox.
pub fn receive_public(host: &dyn FederationHost, body: &str, legacy: bool) -> ReceiveResult<()> {
    let codec = Codec::new(host);
    let envelope = if legacy {
        Slap::from_xml(&codec, body)?
    } else {
        MagicEnvelope::unwrap_xml(&codec, body, None, None)?
    };
    PublicReceiver::new(host).receive(envelope)
}

/// Receives a body posted to a person's private inbox.
///
/// `recipient_key` decrypts the body; `recipient_id` is passed on to the
/// host with the entity.
pub fn receive_private(
    host: &dyn FederationHost,
    body: &str,
    recipient_key: Option<&PrivateKey>,
    recipient_id: Option<&str>,
    legacy: bool,
) -> ReceiveResult<()> {
    let key = recipient_key.ok_or(ReceiveError::RecipientKeyNotFound)?;
    let codec = Codec::new(host);
    let envelope = if legacy {
        EncryptedSlap::from_xml(&codec, body, key)?
    } else {
        let xml = EncryptedMagicEnvelope::decrypt(body, key)?;
        MagicEnvelope::unwrap_xml(&codec, &xml, None, None)?
    };
    PrivateReceiver::new(host, recipient_id).receive(envelope)
}
