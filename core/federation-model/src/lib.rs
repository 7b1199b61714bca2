//! Core entity model for the federation protocol.
//!
//! Defines the types every federation layer depends on:
//! - [`EntitySchema`]: an entity type's ordered property table, validation
//!   rules and capabilities (relayable, signable)
//! - [`Entity`]: an immutable, validated instance of a schema
//! - [`RelatedEntity`]: the minimal stand-in for a relayable's parent
//! - [`Registry`]: maps wire tags (`status_message`) to schemas
//! - [`FederationHost`]: the callbacks the host application provides
//! - [`signing`]: signable and relayable signature handling
//!
//! The built-in catalogue (posts, comments, likes, profiles, ...) lives in
//! [`entities`]. Codecs and envelopes in the crates above consume these types.

mod additional;
pub mod entities;
mod entity;
mod error;
mod host;
pub mod naming;
mod registry;
mod related;
mod schema;
pub mod signing;
pub mod validation;
mod value;

pub use additional::{AdditionalElement, RawContent};
pub use entity::{Entity, EntityBuilder};
pub use error::{HostError, LookupError, SchemaError, SignatureError, ValidationError, Violation};
pub use host::FederationHost;
pub use registry::Registry;
pub use related::RelatedEntity;
pub use schema::{
    AUTHOR_SIGNATURE, DefaultValue, EntityKind, EntitySchema, PARENT_AUTHOR_SIGNATURE, PARENT_GUID,
    ParentType, PropertyDef, PropertyType, SchemaBuilder, SignableSpec,
};
pub use signing::{RelayableEntity, Signable, SignedEntity};
pub use validation::Rule;
pub use value::{Data, Value};
