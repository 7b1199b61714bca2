//! The legacy `<diaspora>` wrapper with a plaintext sender header.
//!
//! ```xml
//! <diaspora xmlns="https://joindiaspora.com/protocol" xmlns:me="...">
//!   <header><author_id>alice@pod.example</author_id></header>
//!   <me:env>...</me:env>
//! </diaspora>
//! ```

use federation_codec::{Codec, Element};
use federation_crypto::{CipherParams, PrivateKey};
use federation_model::Entity;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::magic_envelope::{MagicEnvelope, XMLNS};

/// Namespace of the outer `<diaspora>` element.
pub const PROTOCOL_XMLNS: &str = "https://joindiaspora.com/protocol";

pub struct Slap;

impl Slap {
    /// Signs `entity` as `author_id` and wraps it in a public slap.
    pub fn generate_xml(
        codec: &Codec<'_>,
        author_id: &str,
        key: &PrivateKey,
        entity: &Entity,
    ) -> EnvelopeResult<String> {
        let envelope =
            MagicEnvelope::new(entity.clone(), None).envelop_legacy(codec, key, None)?;
        let header = Element::new("header").with_child(Element::leaf("author_id", author_id));
        Ok(document(header, envelope).to_xml())
    }

    /// Reads the sender from the header and unwraps the envelope.
    pub fn from_xml(codec: &Codec<'_>, xml: &str) -> EnvelopeResult<MagicEnvelope> {
        let root = parse_root(xml)?;
        let author_id = root
            .child("header")
            .and_then(|header| header.child("author_id"))
            .map(|author| author.text().trim())
            .filter(|author| !author.is_empty())
            .ok_or(EnvelopeError::MissingAuthor)?;
        unwrap_inner(codec, &root, author_id, None)
    }
}

pub(crate) fn document(header: Element, envelope: Element) -> Element {
    Element::new("diaspora")
        .with_attribute("xmlns", PROTOCOL_XMLNS)
        .with_attribute("xmlns:me", XMLNS)
        .with_child(header)
        .with_child(envelope)
}

pub(crate) fn parse_root(xml: &str) -> EnvelopeResult<Element> {
    let root = Element::parse(xml)?;
    if root.local_name() != "diaspora" {
        return Err(EnvelopeError::InvalidRootNode(root.name().to_string()));
    }
    Ok(root)
}

pub(crate) fn unwrap_inner(
    codec: &Codec<'_>,
    root: &Element,
    author_id: &str,
    cipher: Option<&CipherParams>,
) -> EnvelopeResult<MagicEnvelope> {
    let envelope = root.child("env").ok_or(EnvelopeError::MissingMagicEnvelope)?;
    MagicEnvelope::unwrap(codec, envelope, Some(author_id), cipher)
}
