//! The legacy `<diaspora>` wrapper with an encrypted sender header.
//!
//! The payload is AES-encrypted with one key; that key, its iv and the
//! author id form a small `<decrypted_header>` document which is itself
//! encrypted with a second AES key. Only the second key goes through RSA.
//!
//! ```xml
//! <diaspora xmlns="https://joindiaspora.com/protocol" xmlns:me="...">
//!   <encrypted_header>{base64(json {aes_key, ciphertext})}</encrypted_header>
//!   <me:env>...</me:env>
//! </diaspora>
//! ```

use federation_codec::{Codec, Element};
use federation_crypto::{CipherParams, PrivateKey, PublicKey, cipher, encoding, sealed};
use federation_model::Entity;
use serde::{Deserialize, Serialize};

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::magic_envelope::MagicEnvelope;
use crate::slap::{document, parse_root, unwrap_inner};

#[derive(Serialize, Deserialize)]
struct EncryptedHeaderJson {
    aes_key: String,
    ciphertext: String,
}

/// A signed, encrypted envelope ready to be addressed to any number of
/// recipients. Each recipient gets its own encrypted header.
#[derive(Debug)]
pub struct EncryptedSlap {
    author_id: String,
    payload_params: CipherParams,
    envelope: Element,
}

impl EncryptedSlap {
    /// Encrypts and signs `entity` once.
    pub fn prepare(
        codec: &Codec<'_>,
        author_id: &str,
        sender_key: &PrivateKey,
        entity: &Entity,
    ) -> EnvelopeResult<Self> {
        let payload_params = CipherParams::generate();
        let envelope = MagicEnvelope::new(entity.clone(), None).envelop_legacy(
            codec,
            sender_key,
            Some(&payload_params),
        )?;
        Ok(Self {
            author_id: author_id.to_string(),
            payload_params,
            envelope,
        })
    }

    /// Serializes the slap for `recipient`.
    pub fn generate_xml(&self, recipient: &PublicKey) -> EnvelopeResult<String> {
        let header = Element::new("decrypted_header")
            .with_child(Element::leaf("iv", self.payload_params.iv_base64()))
            .with_child(Element::leaf("aes_key", self.payload_params.key_base64()))
            .with_child(Element::leaf("author_id", self.author_id.as_str()));

        let header_params = CipherParams::generate();
        let json = serde_json::to_vec(&EncryptedHeaderJson {
            aes_key: sealed::seal(&header_params, recipient)?,
            ciphertext: cipher::encrypt_string(&header_params, &header.to_xml()),
        })?;
        let encrypted_header = Element::leaf("encrypted_header", encoding::encode(json));
        Ok(document(encrypted_header, self.envelope.clone()).to_xml())
    }

    /// Decrypts the header with the recipient's key, then unwraps the
    /// envelope as the author it names.
    pub fn from_xml(
        codec: &Codec<'_>,
        xml: &str,
        key: &PrivateKey,
    ) -> EnvelopeResult<MagicEnvelope> {
        let root = parse_root(xml)?;
        let encrypted = root
            .child("encrypted_header")
            .map(|header| header.text().split_whitespace().collect::<String>())
            .filter(|header| !header.is_empty())
            .ok_or(EnvelopeError::MissingAuthor)?;

        let json: EncryptedHeaderJson = serde_json::from_slice(&encoding::decode(&encrypted)?)?;
        let header_params = sealed::open(&json.aes_key, key)?;
        let header = Element::parse(&cipher::decrypt_string(&header_params, &json.ciphertext)?)?;

        let text = |name: &str| {
            header
                .child(name)
                .map(|e| e.text().trim().to_string())
                .filter(|t| !t.is_empty())
        };
        let author_id = text("author_id").ok_or(EnvelopeError::MissingAuthor)?;
        let (Some(aes_key), Some(iv)) = (text("aes_key"), text("iv")) else {
            return Err(EnvelopeError::InvalidEnvelope(
                "decrypted header is missing aes_key or iv".into(),
            ));
        };
        let payload_params = CipherParams::from_base64(&aes_key, &iv)?;

        unwrap_inner(codec, &root, &author_id, Some(&payload_params))
    }
}
