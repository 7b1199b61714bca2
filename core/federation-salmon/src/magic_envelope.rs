//! The Magic Envelope.
//!
//! ```xml
//! <me:env xmlns:me="http://salmon-protocol.org/ns/magic-env">
//!   <me:data type="application/xml">{base64url(entity xml)}</me:data>
//!   <me:encoding>base64url</me:encoding>
//!   <me:alg>RSA-SHA256</me:alg>
//!   <me:sig key_id="{base64url(sender)}">{base64url(signature)}</me:sig>
//! </me:env>
//! ```
//!
//! The signature covers `data.type.encoding.alg`, each part base64url
//! encoded. When the payload is encrypted the signature covers the
//! ciphertext, so a receiver verifies before it decrypts.

use federation_codec::{Codec, Element, XmlPayload};
use federation_crypto::{CipherParams, PrivateKey, cipher, encoding};
use federation_model::Entity;
use tracing::{debug, warn};

use crate::error::{EnvelopeError, EnvelopeResult};

/// Magic envelope namespace.
pub const XMLNS: &str = "http://salmon-protocol.org/ns/magic-env";
/// Payload media type.
pub const DATA_TYPE: &str = "application/xml";
/// Payload encoding.
pub const ENCODING: &str = "base64url";
/// Signature algorithm.
pub const ALGORITHM: &str = "RSA-SHA256";

const PREFIX: &str = "me";

/// A payload entity and the person who sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct MagicEnvelope {
    payload: Entity,
    sender: Option<String>,
}

impl MagicEnvelope {
    pub fn new(payload: Entity, sender: Option<String>) -> Self {
        Self { payload, sender }
    }

    pub fn payload(&self) -> &Entity {
        &self.payload
    }

    pub fn into_payload(self) -> Entity {
        self.payload
    }

    /// The sender: given at construction or verified on unwrap.
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Serializes the payload, signs it with `key` and builds the envelope.
    pub fn envelop(&self, codec: &Codec<'_>, key: &PrivateKey) -> EnvelopeResult<Element> {
        let payload = codec.encode_element(&self.payload)?;
        Ok(self.seal_payload(&payload.to_xml(), key, None))
    }

    /// Like [`envelop`](Self::envelop), but the payload is wrapped for legacy
    /// peers and optionally AES-encrypted before encoding.
    pub(crate) fn envelop_legacy(
        &self,
        codec: &Codec<'_>,
        key: &PrivateKey,
        cipher: Option<&CipherParams>,
    ) -> EnvelopeResult<Element> {
        let payload = XmlPayload::pack(codec.encode_element(&self.payload)?);
        Ok(self.seal_payload(&payload.to_xml(), key, cipher))
    }

    fn seal_payload(&self, payload: &str, key: &PrivateKey, cipher: Option<&CipherParams>) -> Element {
        let data = match cipher {
            Some(params) => encoding::urlsafe_encode(cipher::encrypt_string(params, payload)),
            None => encoding::urlsafe_encode(payload),
        };
        let signature = encoding::urlsafe_encode(key.sign(signature_subject(&data).as_bytes()));

        let mut sig = Element::new(qualified("sig")).with_text(signature);
        if let Some(sender) = &self.sender {
            sig = sig.with_attribute("key_id", encoding::urlsafe_encode(sender));
        }
        Element::new(qualified("env"))
            .with_attribute(format!("xmlns:{PREFIX}"), XMLNS)
            .with_child(
                Element::new(qualified("data"))
                    .with_attribute("type", DATA_TYPE)
                    .with_text(data),
            )
            .with_child(Element::leaf(qualified("encoding"), ENCODING))
            .with_child(Element::leaf(qualified("alg"), ALGORITHM))
            .with_child(sig)
    }

    /// Builds and serializes an envelope in one step.
    pub fn wrap(
        codec: &Codec<'_>,
        entity: Entity,
        key: &PrivateKey,
        sender: Option<String>,
    ) -> EnvelopeResult<String> {
        Ok(Self::new(entity, sender).envelop(codec, key)?.to_xml())
    }

    /// Verifies an envelope and decodes its payload.
    ///
    /// Checks run in a fixed order: structure, data type, encoding,
    /// algorithm, signature, then decryption (if `cipher` is given) and
    /// payload decoding. The sender is `sender` if given, else the `key_id`.
    pub fn unwrap(
        codec: &Codec<'_>,
        envelope: &Element,
        sender: Option<&str>,
        cipher: Option<&CipherParams>,
    ) -> EnvelopeResult<MagicEnvelope> {
        let parts = EnvelopeParts::from_element(envelope)?;

        if parts.data_type != DATA_TYPE {
            return Err(EnvelopeError::InvalidDataType(parts.data_type.to_string()));
        }
        if parts.encoding != ENCODING {
            return Err(EnvelopeError::InvalidEncoding(parts.encoding.to_string()));
        }
        if parts.alg != ALGORITHM {
            return Err(EnvelopeError::InvalidAlgorithm(parts.alg.to_string()));
        }

        let sender = match sender {
            Some(sender) => sender.to_string(),
            None => Self::sender_from_key_id(envelope)
                .ok_or_else(|| EnvelopeError::InvalidEnvelope("no sender and no key_id".into()))?,
        };
        let key = codec
            .host()
            .fetch_public_key(&sender)
            .ok_or_else(|| EnvelopeError::SenderKeyNotFound(sender.clone()))?;
        let signature = encoding::urlsafe_decode(parts.sig).unwrap_or_default();
        if !key.verify(signature_subject(&parts.data).as_bytes(), &signature) {
            warn!(sender = %sender, "magic envelope signature mismatch");
            return Err(EnvelopeError::SignatureVerificationFailed(sender));
        }

        let data = encoding::urlsafe_decode(&parts.data)
            .map_err(|_| EnvelopeError::InvalidEnvelope("data is not base64url".into()))?;
        let payload = match cipher {
            Some(params) => {
                let ciphertext = String::from_utf8(data)
                    .map_err(|_| EnvelopeError::InvalidEnvelope("encrypted data is not base64".into()))?;
                cipher::decrypt_string(params, &ciphertext)?
            }
            None => String::from_utf8(data)
                .map_err(|_| EnvelopeError::InvalidEnvelope("data is not UTF-8".into()))?,
        };

        let entity = codec.decode_xml(&payload)?;
        debug!(sender = %sender, entity = entity.entity_type(), "unwrapped magic envelope");
        Ok(Self::new(entity, Some(sender)))
    }

    /// Parses an envelope document and unwraps it.
    pub fn unwrap_xml(
        codec: &Codec<'_>,
        document: &str,
        sender: Option<&str>,
        cipher: Option<&CipherParams>,
    ) -> EnvelopeResult<MagicEnvelope> {
        Self::unwrap(codec, &Element::parse(document)?, sender, cipher)
    }

    /// Decodes the sender embedded in `me:sig`'s `key_id`, if any.
    pub fn sender_from_key_id(envelope: &Element) -> Option<String> {
        let key_id = envelope.child("sig")?.attribute("key_id")?;
        let raw = encoding::urlsafe_decode(key_id).ok()?;
        String::from_utf8(raw).ok().filter(|s| !s.is_empty())
    }
}

/// The four text parts of an envelope, checked for presence.
struct EnvelopeParts<'a> {
    data: String,
    data_type: &'a str,
    encoding: &'a str,
    alg: &'a str,
    sig: &'a str,
}

impl<'a> EnvelopeParts<'a> {
    fn from_element(envelope: &'a Element) -> EnvelopeResult<Self> {
        if envelope.local_name() != "env" {
            return Err(EnvelopeError::InvalidEnvelope(format!(
                "root is {}, not env",
                envelope.name()
            )));
        }
        let data = required(envelope, "data")?;
        Ok(Self {
            data: data.text().split_whitespace().collect(),
            data_type: data.attribute("type").unwrap_or_default(),
            encoding: required(envelope, "encoding")?.text().trim(),
            alg: required(envelope, "alg")?.text().trim(),
            sig: required(envelope, "sig")?.text().trim(),
        })
    }
}

fn required<'a>(envelope: &'a Element, name: &str) -> EnvelopeResult<&'a Element> {
    envelope
        .child(name)
        .filter(|e| !e.text().trim().is_empty())
        .ok_or_else(|| EnvelopeError::InvalidEnvelope(format!("missing {name}")))
}

fn qualified(name: &str) -> String {
    format!("{PREFIX}:{name}")
}

/// `data.type.encoding.alg`, each base64url encoded.
fn signature_subject(data: &str) -> String {
    [data, DATA_TYPE, ENCODING, ALGORITHM]
        .iter()
        .map(|part| encoding::urlsafe_encode(part))
        .collect::<Vec<_>>()
        .join(".")
}
