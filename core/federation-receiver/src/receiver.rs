//! Public and private receivers.
//!
//! Both check that the verified envelope sender may speak for the entity's
//! author, then apply their own visibility rule and hand the entity to
//! [`FederationHost::receive_entity`].

use federation_model::{Entity, FederationHost};
use federation_salmon::MagicEnvelope;
use tracing::{debug, warn};

use crate::error::{ReceiveError, ReceiveResult};

/// Receives entities sent to the public inbox.
pub struct PublicReceiver<'a> {
    host: &'a dyn FederationHost,
}

impl<'a> PublicReceiver<'a> {
    pub fn new(host: &'a dyn FederationHost) -> Self {
        Self { host }
    }

    /// Entities with a `public` flag must have it set.
    pub fn receive(&self, envelope: MagicEnvelope) -> ReceiveResult<()> {
        let (entity, sender) = validated(envelope)?;
        if entity.public() == Some(false) {
            warn!(entity = entity.entity_type(), sender = %sender, "non-public entity on the public path");
            return Err(ReceiveError::NotPublic {
                entity: entity.entity_type().to_string(),
                guid: entity.guid().unwrap_or_default().to_string(),
            });
        }
        debug!(entity = entity.entity_type(), sender = %sender, "received public entity");
        self.host.receive_entity(entity, &sender, None)?;
        Ok(())
    }
}

/// Receives entities addressed to one local person.
pub struct PrivateReceiver<'a> {
    host: &'a dyn FederationHost,
    recipient_id: Option<&'a str>,
}

impl<'a> PrivateReceiver<'a> {
    pub fn new(host: &'a dyn FederationHost, recipient_id: Option<&'a str>) -> Self {
        Self { host, recipient_id }
    }

    pub fn receive(&self, envelope: MagicEnvelope) -> ReceiveResult<()> {
        let recipient = self.recipient_id.ok_or(ReceiveError::RecipientRequired)?;
        let (entity, sender) = validated(envelope)?;
        debug!(entity = entity.entity_type(), sender = %sender, recipient, "received private entity");
        self.host.receive_entity(entity, &sender, Some(recipient))?;
        Ok(())
    }
}

fn validated(envelope: MagicEnvelope) -> ReceiveResult<(Entity, String)> {
    let sender = envelope.sender().unwrap_or_default().to_string();
    let entity = envelope.into_payload();
    if !entity.sender_valid(&sender) {
        warn!(entity = entity.entity_type(), sender = %sender, "sender does not match author");
        return Err(ReceiveError::InvalidSender {
            author: entity.author().unwrap_or_default().to_string(),
            entity: entity.entity_type().to_string(),
            sender,
        });
    }
    Ok((entity, sender))
}
