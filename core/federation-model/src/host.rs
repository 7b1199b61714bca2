//! Callbacks the host application provides.

use federation_crypto::{PrivateKey, PublicKey};

use crate::entity::Entity;
use crate::error::HostError;
use crate::related::RelatedEntity;

/// The injection boundary between the protocol core and the application.
///
/// Every method may perform I/O. A `None` result is surfaced by the caller as
/// a typed error, never silently ignored. Implementations are shared across
/// threads.
pub trait FederationHost: Send + Sync {
    /// Public key of the person with this diaspora ID.
    fn fetch_public_key(&self, diaspora_id: &str) -> Option<PublicKey>;

    /// Private key of a person hosted by this pod.
    fn fetch_private_key(&self, diaspora_id: &str) -> Option<PrivateKey>;

    /// Public key of the author of the post with this guid.
    fn fetch_public_key_by_post_guid(&self, _guid: &str) -> Option<PublicKey> {
        None
    }

    /// Private key of the local author of the post with this guid.
    fn fetch_private_key_by_post_guid(&self, _guid: &str) -> Option<PrivateKey> {
        None
    }

    /// Whether the author of the post with this guid lives on this pod.
    fn post_author_is_local(&self, guid: &str) -> bool;

    /// Looks up the parent of a relayable; `entity_type` is a class name
    /// such as `Post` or `Comment`.
    fn fetch_related_entity(&self, entity_type: &str, guid: &str) -> Option<RelatedEntity>;

    /// Hands a received, verified entity to the application.
    fn receive_entity(
        &self,
        entity: Entity,
        sender: &str,
        recipient_id: Option<&str>,
    ) -> Result<(), HostError>;
}
