//! Entity signatures.
//!
//! Two capabilities exist. A *signable* entity carries one signature by a
//! declared signer. A *relayable* entity carries two: the author's, and the
//! parent author's, so that the parent's pod can relay it to everyone who
//! received the parent while each receiver can still verify the origin.
//!
//! Both sign the same primitive, `values.join(";")`. For relayables the
//! value order matters: entities parsed from the wire are signed in the order
//! their elements arrived, everything else in schema order.

use federation_crypto::{PrivateKey, PublicKey, signature};
use tracing::{debug, warn};

use crate::entity::Entity;
use crate::error::SignatureError;
use crate::host::FederationHost;
use crate::related::RelatedEntity;
use crate::schema::{
    AUTHOR_SIGNATURE, EntityKind, PARENT_AUTHOR_SIGNATURE, PARENT_GUID, ParentType, SignableSpec,
};
use crate::value::Value;

/// Something with a canonical signed string.
pub trait Signable {
    fn signature_data(&self) -> String;

    fn sign_with_key(&self, key: &PrivateKey) -> String {
        signature::sign(key, &self.signature_data())
    }

    fn verify_signature(&self, key: Option<&PublicKey>, signature: Option<&str>) -> bool {
        signature::verify(key, &self.signature_data(), signature)
    }
}

impl Entity {
    /// Relayable view, if the schema is relayable.
    pub fn as_relayable(&self) -> Option<RelayableEntity<'_>> {
        match self.schema().kind() {
            EntityKind::Relayable(parent_type) => Some(RelayableEntity {
                entity: self,
                parent_type,
            }),
            _ => None,
        }
    }

    /// Single-signature view, if the schema is signable.
    pub fn as_signed(&self) -> Option<SignedEntity<'_>> {
        match self.schema().kind() {
            EntityKind::Signable(spec) => Some(SignedEntity { entity: self, spec }),
            _ => None,
        }
    }

    /// Checks whatever signatures the entity's type carries.
    pub fn verify_signatures(&self, host: &dyn FederationHost) -> Result<(), SignatureError> {
        if let Some(relayable) = self.as_relayable() {
            relayable.verify_signatures(host)
        } else if let Some(signed) = self.as_signed() {
            signed.verify(host)
        } else {
            Ok(())
        }
    }

    /// A copy with missing signatures filled in; existing ones are kept.
    pub fn signed(&self, host: &dyn FederationHost) -> Result<Entity, SignatureError> {
        if let Some(relayable) = self.as_relayable() {
            relayable.enriched(host)
        } else if let Some(signed) = self.as_signed() {
            signed.enriched(host)
        } else {
            Ok(self.clone())
        }
    }

    /// Whether `sender` may deliver this entity.
    ///
    /// Usually only the author may. A relayable may also arrive from its
    /// parent's author or the author at the top of the chain, who relay it.
    pub fn sender_valid(&self, sender: &str) -> bool {
        if self.author() == Some(sender) {
            return true;
        }
        self.as_relayable()
            .and_then(|relayable| relayable.entity.parent())
            .is_some_and(|parent| parent.author == sender || parent.root().author == sender)
    }
}

/// A relayable entity with its two-tier signature operations.
#[derive(Debug, Clone, Copy)]
pub struct RelayableEntity<'a> {
    entity: &'a Entity,
    parent_type: ParentType,
}

impl<'a> RelayableEntity<'a> {
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    pub fn author(&self) -> &'a str {
        self.entity.author().unwrap_or_default()
    }

    pub fn guid(&self) -> &'a str {
        self.entity.guid().unwrap_or_default()
    }

    pub fn parent_guid(&self) -> &'a str {
        self.entity.get_str(PARENT_GUID).unwrap_or_default()
    }

    /// Class name of the parent, e.g. `Post`.
    pub fn parent_type(&self) -> Option<&'a str> {
        match self.parent_type {
            ParentType::Fixed(name) => Some(name),
            ParentType::Property(property) => self.entity.get_str(property),
        }
    }

    pub fn author_signature(&self) -> Option<&'a str> {
        self.entity.get_str(AUTHOR_SIGNATURE)
    }

    pub fn parent_author_signature(&self) -> Option<&'a str> {
        self.entity.get_str(PARENT_AUTHOR_SIGNATURE)
    }

    /// Element names whose values are signed, in signing order.
    ///
    /// The order elements arrived in if the entity was parsed; otherwise the
    /// schema order followed by any undeclared elements.
    pub fn signature_order(&self) -> Vec<String> {
        let schema = self.entity.schema();
        let is_signature = |tag: &str| {
            schema
                .property_for_tag(tag)
                .is_some_and(|p| schema.is_signature_field(p.name()))
        };
        match self.entity.wire_order() {
            Some(order) => order
                .iter()
                .filter(|tag| !is_signature(tag.as_str()))
                .cloned()
                .collect(),
            None => schema
                .properties()
                .iter()
                .filter(|p| !schema.is_signature_field(p.name()))
                .map(|p| p.xml_name().to_string())
                .chain(
                    self.entity
                        .additional_elements()
                        .iter()
                        .map(|element| element.name().to_string()),
                )
                .collect(),
        }
    }

    /// The parent, from the entity or else from the host.
    pub fn resolve_parent(&self, host: &dyn FederationHost) -> Result<RelatedEntity, SignatureError> {
        if let Some(parent) = self.entity.parent() {
            return Ok(parent.clone());
        }
        let parent_type = self.parent_type().unwrap_or_default();
        host.fetch_related_entity(parent_type, self.parent_guid())
            .ok_or_else(|| SignatureError::ParentNotFound {
                parent_type: parent_type.to_string(),
                guid: self.parent_guid().to_string(),
            })
    }

    /// Whether this pod hosts the parent's author. Verification and signing
    /// both ask the host, so `RelatedEntity::local` only describes the parent.
    pub fn parent_is_local(&self, host: &dyn FederationHost) -> bool {
        host.post_author_is_local(self.parent_guid())
    }

    /// Verifies the author signature, then the parent author signature
    /// unless the parent's author is local to this pod.
    pub fn verify_signatures(&self, host: &dyn FederationHost) -> Result<(), SignatureError> {
        let parent = self.resolve_parent(host)?;
        let data = self.signature_data();

        let author_key = host
            .fetch_public_key(self.author())
            .ok_or_else(|| SignatureError::PublicKeyNotFound(self.author().to_string()))?;
        if !signature::verify(Some(&author_key), &data, self.author_signature()) {
            warn!(entity = self.entity.entity_type(), guid = self.guid(), "author signature mismatch");
            return Err(self.verification_failed(AUTHOR_SIGNATURE));
        }

        if self.parent_is_local(host) {
            debug!(
                entity = self.entity.entity_type(),
                guid = self.guid(),
                "parent author is local, parent author signature not required"
            );
            return Ok(());
        }

        let parent_key = host
            .fetch_public_key(&parent.author)
            .or_else(|| host.fetch_public_key_by_post_guid(self.parent_guid()))
            .ok_or_else(|| SignatureError::PublicKeyNotFound(parent.author.clone()))?;
        if !signature::verify(Some(&parent_key), &data, self.parent_author_signature()) {
            warn!(entity = self.entity.entity_type(), guid = self.guid(), "parent author signature mismatch");
            return Err(self.verification_failed(PARENT_AUTHOR_SIGNATURE));
        }

        debug!(entity = self.entity.entity_type(), guid = self.guid(), "relayable signatures valid");
        Ok(())
    }

    /// A copy with the author signature and, for a local parent, the parent
    /// author signature filled in.
    pub fn enriched(&self, host: &dyn FederationHost) -> Result<Entity, SignatureError> {
        let parent = self.resolve_parent(host)?;
        let data = self.signature_data();
        let mut entity = self.entity.clone();

        if self.author_signature().is_none() {
            let key = host
                .fetch_private_key(self.author())
                .ok_or_else(|| SignatureError::AuthorPrivateKeyNotFound(self.author().to_string()))?;
            entity = entity.with_value(AUTHOR_SIGNATURE, Value::String(signature::sign(&key, &data)));
        }

        if self.parent_author_signature().is_none() && self.parent_is_local(host) {
            let key = host
                .fetch_private_key_by_post_guid(self.parent_guid())
                .or_else(|| host.fetch_private_key(&parent.author));
            match key {
                Some(key) => {
                    entity = entity
                        .with_value(PARENT_AUTHOR_SIGNATURE, Value::String(signature::sign(&key, &data)));
                }
                None => debug!(guid = self.guid(), "no key for local parent author, leaving signature empty"),
            }
        }

        Ok(entity.with_parent(parent))
    }

    fn verification_failed(&self, field: &'static str) -> SignatureError {
        SignatureError::SignatureVerificationFailed {
            entity: self.entity.class_name().to_string(),
            guid: self.guid().to_string(),
            field,
        }
    }
}

impl Signable for RelayableEntity<'_> {
    fn signature_data(&self) -> String {
        let schema = self.entity.schema();
        let values = self.signature_order().into_iter().map(|tag| {
            match schema.property_for_tag(&tag) {
                Some(property) => self
                    .entity
                    .get(property.name())
                    .and_then(Value::to_wire_string)
                    .unwrap_or_default(),
                None => self
                    .entity
                    .additional_element(&tag)
                    .unwrap_or_default()
                    .to_string(),
            }
        });
        signature::canonical_string(values)
    }
}

/// An entity carrying one signature by a declared signer.
#[derive(Debug, Clone, Copy)]
pub struct SignedEntity<'a> {
    entity: &'a Entity,
    spec: SignableSpec,
}

impl<'a> SignedEntity<'a> {
    pub fn entity(&self) -> &'a Entity {
        self.entity
    }

    /// Diaspora ID whose key signs the entity.
    pub fn signer(&self) -> Option<String> {
        (self.spec.signer)(self.entity)
    }

    pub fn signature(&self) -> Option<&'a str> {
        self.entity.get_str(self.spec.field)
    }

    pub fn verify(&self, host: &dyn FederationHost) -> Result<(), SignatureError> {
        let signer = self.signer().unwrap_or_default();
        let key = host
            .fetch_public_key(&signer)
            .ok_or_else(|| SignatureError::PublicKeyNotFound(signer.clone()))?;
        if !self.verify_signature(Some(&key), self.signature()) {
            warn!(entity = self.entity.entity_type(), signer = %signer, "signature mismatch");
            return Err(SignatureError::SignatureVerificationFailed {
                entity: self.entity.class_name().to_string(),
                guid: self.entity.guid().unwrap_or_default().to_string(),
                field: self.spec.field,
            });
        }
        debug!(entity = self.entity.entity_type(), signer = %signer, "signature valid");
        Ok(())
    }

    /// A copy with the signature filled in if it was missing.
    pub fn enriched(&self, host: &dyn FederationHost) -> Result<Entity, SignatureError> {
        if self.signature().is_some() {
            return Ok(self.entity.clone());
        }
        let signer = self.signer().unwrap_or_default();
        let key = host
            .fetch_private_key(&signer)
            .ok_or(SignatureError::AuthorPrivateKeyNotFound(signer))?;
        Ok(self
            .entity
            .with_value(self.spec.field, Value::String(self.sign_with_key(&key))))
    }
}

impl Signable for SignedEntity<'_> {
    fn signature_data(&self) -> String {
        (self.spec.data)(self.entity)
    }
}
