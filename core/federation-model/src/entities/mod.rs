//! The built-in entity catalogue.
//!
//! Each type is a lazily built static schema. Nested types reference each
//! other through these statics, so a type must never nest itself.

mod conversation;
mod interaction;
mod person;
mod post;

use federation_types::Timestamp;

use crate::schema::{EntitySchema, SchemaBuilder};
use crate::value::Value;

pub use conversation::{CONVERSATION, MESSAGE};
pub use interaction::{COMMENT, EVENT_PARTICIPATION, LIKE, PARTICIPATION, POLL_PARTICIPATION, RETRACTION};
pub use person::{ACCOUNT_DELETION, ACCOUNT_MIGRATION, CONTACT, PERSON, PROFILE};
pub use post::{EMBED, EVENT, LOCATION, PHOTO, POLL, POLL_ANSWER, RESHARE, STATUS_MESSAGE};

/// Maximum length of free text such as post bodies.
pub const TEXT_MAX: usize = 65_535;

/// Every built-in schema.
pub fn all() -> Vec<&'static EntitySchema> {
    vec![
        &*PERSON,
        &*PROFILE,
        &*CONTACT,
        &*ACCOUNT_DELETION,
        &*ACCOUNT_MIGRATION,
        &*STATUS_MESSAGE,
        &*PHOTO,
        &*LOCATION,
        &*POLL,
        &*POLL_ANSWER,
        &*EVENT,
        &*EMBED,
        &*RESHARE,
        &*COMMENT,
        &*LIKE,
        &*POLL_PARTICIPATION,
        &*EVENT_PARTICIPATION,
        &*PARTICIPATION,
        &*CONVERSATION,
        &*MESSAGE,
        &*RETRACTION,
    ]
}

/// Default generator for creation timestamps.
pub fn now() -> Value {
    Value::Timestamp(Timestamp::now())
}

fn builtin(builder: SchemaBuilder) -> EntitySchema {
    match builder.build() {
        Ok(schema) => schema,
        Err(err) => panic!("invalid built-in schema: {err}"),
    }
}
