use std::sync::LazyLock;

use super::{TEXT_MAX, builtin, now};
use crate::schema::{EntitySchema, PropertyDef};
use crate::validation::Rule;
use crate::value::Value;

pub static MESSAGE: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("message")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("text"))
            .property(PropertyDef::timestamp("created_at").default_with(now))
            .property(PropertyDef::string("conversation_guid"))
            .rule("author", vec![Rule::DiasporaId])
            .rule("guid", vec![Rule::Guid])
            .rule("text", vec![Rule::NotEmpty, Rule::Length { min: 1, max: TEXT_MAX }])
            .rule("conversation_guid", vec![Rule::Guid]),
    )
});

pub static CONVERSATION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("conversation")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("subject"))
            .property(PropertyDef::timestamp("created_at").default_with(now))
            .property(PropertyDef::list("messages", &MESSAGE).default_value(Value::List(Vec::new())))
            .property(PropertyDef::string("participants").wire_name("participant_handles"))
            .rule("author", vec![Rule::DiasporaId])
            .rule("guid", vec![Rule::Guid])
            .rule("subject", vec![Rule::Length { min: 1, max: 255 }])
            .rule("participants", vec![Rule::DiasporaIdList { min: 1, max: 20 }]),
    )
});
