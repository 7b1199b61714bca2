//! Magic envelopes encrypted for a single recipient.
//!
//! The envelope XML is encrypted with a one-time AES key; that key is
//! sealed with the recipient's RSA key. Both travel as JSON:
//!
//! ```json
//! {"aes_key": "...", "encrypted_magic_envelope": "..."}
//! ```

use federation_crypto::{CipherParams, PrivateKey, PublicKey, cipher, sealed};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EnvelopeError, EnvelopeResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EncryptedEnvelopeJson {
    aes_key: String,
    encrypted_magic_envelope: String,
}

/// Hybrid encryption of a serialized magic envelope.
pub struct EncryptedMagicEnvelope;

impl EncryptedMagicEnvelope {
    /// Encrypts `envelope_xml` for `recipient`, returning the JSON document.
    pub fn encrypt(envelope_xml: &str, recipient: &PublicKey) -> EnvelopeResult<String> {
        let params = CipherParams::generate();
        let json = EncryptedEnvelopeJson {
            aes_key: sealed::seal(&params, recipient)?,
            encrypted_magic_envelope: cipher::encrypt_string(&params, envelope_xml),
        };
        Ok(serde_json::to_string(&json)?)
    }

    /// Recovers the envelope XML from the JSON document.
    pub fn decrypt(document: &str, key: &PrivateKey) -> EnvelopeResult<String> {
        let json: EncryptedEnvelopeJson = serde_json::from_str(document)?;
        if json.aes_key.is_empty() || json.encrypted_magic_envelope.is_empty() {
            return Err(EnvelopeError::InvalidEnvelope(
                "encrypted envelope is missing aes_key or encrypted_magic_envelope".into(),
            ));
        }
        let params = sealed::open(&json.aes_key, key)?;
        let xml = cipher::decrypt_string(&params, &json.encrypted_magic_envelope)?;
        debug!(bytes = xml.len(), "decrypted magic envelope");
        Ok(xml)
    }
}
