//! Host-aware encoding and decoding.

use federation_model::{Entity, FederationHost, Registry};
use tracing::debug;

use crate::error::CodecResult;
use crate::json;
use crate::xml::{self, Element, XmlPayload};

/// Encodes outbound and decodes inbound entities.
///
/// Encoding fills in missing signatures with keys from the host. Decoding
/// resolves a relayable's parent and re-verifies every signature, so an
/// entity returned from a `decode_*` method has been authenticated.
#[derive(Clone, Copy)]
pub struct Codec<'a> {
    host: &'a dyn FederationHost,
    registry: &'a Registry,
    verify: bool,
}

impl<'a> Codec<'a> {
    /// A codec over the built-in entity types.
    pub fn new(host: &'a dyn FederationHost) -> Self {
        Self::with_registry(host, Registry::builtin())
    }

    pub fn with_registry(host: &'a dyn FederationHost, registry: &'a Registry) -> Self {
        Self {
            host,
            registry,
            verify: true,
        }
    }

    /// Skips signature verification on decode and tolerates unresolvable
    /// parents. For inspection tooling only, never for received data.
    #[must_use]
    pub fn without_verification(mut self) -> Self {
        self.verify = false;
        self
    }

    pub fn host(&self) -> &'a dyn FederationHost {
        self.host
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    // ── XML ──────────────────────────────────────────────────────

    /// Signs what is missing and serializes to an element.
    pub fn encode_element(&self, entity: &Entity) -> CodecResult<Element> {
        let signed = entity.signed(self.host)?;
        Ok(xml::to_element(&signed))
    }

    pub fn encode_xml(&self, entity: &Entity) -> CodecResult<String> {
        Ok(self.encode_element(entity)?.to_xml())
    }

    pub fn decode_element(&self, element: &Element) -> CodecResult<Entity> {
        let entity = xml::decode(element, self.registry)?;
        self.authenticate(entity)
    }

    /// Decodes an XML document, with or without the legacy wrapper.
    pub fn decode_xml(&self, document: &str) -> CodecResult<Entity> {
        let root = Element::parse(document)?;
        self.decode_element(XmlPayload::unpack(&root)?)
    }

    // ── JSON ─────────────────────────────────────────────────────

    pub fn encode_json(&self, entity: &Entity) -> CodecResult<serde_json::Value> {
        let signed = entity.signed(self.host)?;
        Ok(json::to_json(&signed))
    }

    pub fn decode_json(&self, value: &serde_json::Value) -> CodecResult<Entity> {
        let entity = json::decode(value, self.registry)?;
        self.authenticate(entity)
    }

    pub fn decode_json_str(&self, document: &str) -> CodecResult<Entity> {
        let value: serde_json::Value = serde_json::from_str(document)?;
        self.decode_json(&value)
    }

    fn authenticate(&self, entity: Entity) -> CodecResult<Entity> {
        let parent = entity
            .as_relayable()
            .map(|relayable| relayable.resolve_parent(self.host));
        let entity = match parent {
            Some(Ok(parent)) => entity.with_parent(parent),
            Some(Err(err)) if self.verify => return Err(err.into()),
            Some(Err(_)) | None => entity,
        };

        if self.verify {
            entity.verify_signatures(self.host)?;
        }
        debug!(
            entity = entity.entity_type(),
            guid = entity.guid().unwrap_or_default(),
            verified = self.verify,
            "decoded entity"
        );
        Ok(entity)
    }
}
