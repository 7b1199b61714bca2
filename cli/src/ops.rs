//! The operations behind each subcommand.

use anyhow::{Context, Result};
use clap::ValueEnum;
use federation_codec::{Codec, json, xml};
use federation_crypto::PrivateKey;
use federation_model::Entity;
use federation_receiver::{PrivateReceiver, PublicReceiver};
use federation_salmon::{EncryptedMagicEnvelope, EncryptedSlap, MagicEnvelope, Slap};
use tracing::info;

use crate::keys::KeyDirectory;

/// Entity serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Xml,
    Json,
}

impl Format {
    /// JSON documents start with `{`; everything else is read as XML.
    pub fn detect(document: &str) -> Self {
        if document.trim_start().starts_with('{') {
            Format::Json
        } else {
            Format::Xml
        }
    }
}

fn read_entity(codec: &Codec<'_>, document: &str) -> Result<Entity> {
    let entity = match Format::detect(document) {
        Format::Json => codec.decode_json_str(document),
        Format::Xml => codec.decode_xml(document),
    };
    entity.context("Failed to decode entity")
}

fn write_entity(entity: &Entity, format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(&json::to_json(entity))?,
        Format::Xml => xml::to_element(entity).to_xml(),
    })
}

/// Signs `document` as `sender` and wraps it in an envelope. With a
/// recipient the envelope is encrypted for them.
pub fn wrap(
    keys: &KeyDirectory,
    sender: &str,
    document: &str,
    recipient: Option<&str>,
    legacy: bool,
) -> Result<String> {
    let codec = Codec::new(keys);
    let entity = read_entity(&codec.without_verification(), document)?;
    let key = keys.load_private(sender)?;
    info!("Wrapping {} from {sender}", entity.entity_type());

    let wrapped = match (recipient, legacy) {
        (None, false) => MagicEnvelope::wrap(&codec, entity, &key, Some(sender.to_string()))?,
        (Some(recipient), false) => {
            let envelope = MagicEnvelope::wrap(&codec, entity, &key, Some(sender.to_string()))?;
            EncryptedMagicEnvelope::encrypt(&envelope, &keys.load_public(recipient)?)?
        }
        (None, true) => Slap::generate_xml(&codec, sender, &key, &entity)?,
        (Some(recipient), true) => EncryptedSlap::prepare(&codec, sender, &key, &entity)?
            .generate_xml(&keys.load_public(recipient)?)?,
    };
    Ok(wrapped)
}

/// Verifies an envelope and returns its entity as JSON.
///
/// Unless `unverified`, the payload's own signatures are checked and the
/// entity goes through the public or private receiver. The envelope
/// signature is always checked.
pub fn unwrap(
    keys: &KeyDirectory,
    document: &str,
    recipient: Option<&str>,
    legacy: bool,
    unverified: bool,
) -> Result<String> {
    let recipient_key = recipient.map(|id| keys.load_private(id)).transpose()?;
    let codec = if unverified {
        Codec::new(keys).without_verification()
    } else {
        Codec::new(keys)
    };
    let envelope = open_envelope(&codec, document, recipient_key.as_ref(), legacy)?;

    let entity = if unverified {
        envelope.into_payload()
    } else {
        match recipient {
            Some(_) => PrivateReceiver::new(keys, recipient).receive(envelope)?,
            None => PublicReceiver::new(keys).receive(envelope)?,
        }
        let (entity, sender, _) = keys
            .take_received()?
            .pop()
            .context("Receiver accepted nothing")?;
        info!("Received {} from {sender}", entity.entity_type());
        entity
    };
    write_entity(&entity, Format::Json)
}

fn open_envelope(
    codec: &Codec<'_>,
    document: &str,
    recipient_key: Option<&PrivateKey>,
    legacy: bool,
) -> Result<MagicEnvelope> {
    let envelope = match (recipient_key, legacy) {
        (None, false) => MagicEnvelope::unwrap_xml(codec, document, None, None)?,
        (Some(key), false) => {
            let xml = EncryptedMagicEnvelope::decrypt(document, key)?;
            MagicEnvelope::unwrap_xml(codec, &xml, None, None)?
        }
        (None, true) => Slap::from_xml(codec, document)?,
        (Some(key), true) => EncryptedSlap::from_xml(codec, document, key)?,
    };
    Ok(envelope)
}

/// Re-serializes an entity in the other format. Signatures are carried
/// over untouched and not verified.
pub fn convert(keys: &KeyDirectory, document: &str, to: Format) -> Result<String> {
    let entity = read_entity(&Codec::new(keys).without_verification(), document)?;
    write_entity(&entity, to)
}
