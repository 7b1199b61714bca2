use std::sync::LazyLock;

use super::{TEXT_MAX, builtin, now};
use crate::schema::{EntitySchema, ParentType, PropertyDef};
use crate::validation::Rule;

/// Types a like or participation may target.
const TARGET_TYPES: &[&str] = &["Post", "Comment"];

pub static COMMENT: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("comment")
            .property(PropertyDef::string("text"))
            .property(PropertyDef::timestamp("created_at").default_with(now))
            .property(PropertyDef::timestamp("edited_at").optional())
            .rule("text", vec![Rule::NotEmpty, Rule::Length { min: 1, max: TEXT_MAX }])
            .relayable(ParentType::Fixed("Post")),
    )
});

pub static LIKE: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("like")
            .property(PropertyDef::string("parent_type").wire_name("target_type"))
            .property(PropertyDef::boolean("positive").default_value(true))
            .rule("parent_type", vec![Rule::OneOf(TARGET_TYPES)])
            .relayable(ParentType::Property("parent_type")),
    )
});

pub static POLL_PARTICIPATION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("poll_participation")
            .property(PropertyDef::string("poll_answer_guid"))
            .rule("poll_answer_guid", vec![Rule::Guid])
            .relayable(ParentType::Fixed("Poll")),
    )
});

pub static EVENT_PARTICIPATION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("event_participation")
            .property(PropertyDef::string("status"))
            .property(PropertyDef::timestamp("edited_at").optional())
            .rule("status", vec![Rule::OneOf(&["accepted", "declined", "tentative"])])
            .relayable(ParentType::Fixed("Event")),
    )
});

pub static PARTICIPATION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("participation")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("parent_guid"))
            .property(PropertyDef::string("parent_type").wire_name("target_type"))
            .rule("author", vec![Rule::DiasporaId])
            .rule("guid", vec![Rule::Guid])
            .rule("parent_guid", vec![Rule::Guid])
            .rule("parent_type", vec![Rule::OneOf(&["Post"])]),
    )
});

pub static RETRACTION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("retraction")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("target_guid").wire_name("post_guid"))
            .property(PropertyDef::string("target_type").wire_name("type"))
            .rule("author", vec![Rule::DiasporaId])
            .rule("target_guid", vec![Rule::Guid])
            .rule("target_type", vec![Rule::NotEmpty]),
    )
});
