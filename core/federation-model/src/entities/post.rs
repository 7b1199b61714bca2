use std::sync::LazyLock;

use super::{TEXT_MAX, builtin, now};
use crate::schema::{EntitySchema, PropertyDef};
use crate::validation::Rule;
use crate::value::Value;

pub static LOCATION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("location")
            .property(PropertyDef::string("address"))
            .property(PropertyDef::string("lat"))
            .property(PropertyDef::string("lng"))
            .rule("lat", vec![Rule::Numeric { min: -90.0, max: 90.0 }])
            .rule("lng", vec![Rule::Numeric { min: -180.0, max: 180.0 }]),
    )
});

pub static PHOTO: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("photo")
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::boolean("public").default_value(false))
            .property(PropertyDef::timestamp("created_at").default_with(now))
            .property(PropertyDef::string("remote_photo_path"))
            .property(PropertyDef::string("remote_photo_name"))
            .property(PropertyDef::string("text").optional())
            .property(PropertyDef::string("status_message_guid").optional())
            .property(PropertyDef::integer("height").optional())
            .property(PropertyDef::integer("width").optional())
            .rule("guid", vec![Rule::Guid])
            .rule("author", vec![Rule::DiasporaId])
            .rule("remote_photo_path", vec![Rule::NotEmpty])
            .rule("remote_photo_name", vec![Rule::NotEmpty])
            .rule("text", vec![Rule::Length { min: 0, max: TEXT_MAX }])
            .rule("status_message_guid", vec![Rule::Guid])
            .rule("height", vec![Rule::Numeric { min: 0.0, max: 1_000_000.0 }])
            .rule("width", vec![Rule::Numeric { min: 0.0, max: 1_000_000.0 }]),
    )
});

pub static POLL_ANSWER: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("poll_answer")
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("answer"))
            .rule("guid", vec![Rule::Guid])
            .rule("answer", vec![Rule::NotEmpty, Rule::Length { min: 1, max: 255 }]),
    )
});

pub static POLL: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("poll")
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("question"))
            .property(PropertyDef::list("poll_answers", &POLL_ANSWER))
            .rule("guid", vec![Rule::Guid])
            .rule("question", vec![Rule::NotEmpty, Rule::Length { min: 1, max: 255 }])
            .rule("poll_answers", vec![Rule::ListLength { min: 2, max: 20 }]),
    )
});

pub static EVENT: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("event")
            .property(PropertyDef::string("author"))
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("summary"))
            .property(PropertyDef::string("description").optional())
            .property(PropertyDef::timestamp("start"))
            .property(PropertyDef::timestamp("end").optional())
            .property(PropertyDef::boolean("all_day").default_value(false))
            .property(PropertyDef::string("timezone").optional())
            .property(PropertyDef::entity("location", &LOCATION).optional())
            .rule("author", vec![Rule::DiasporaId])
            .rule("guid", vec![Rule::Guid])
            .rule("summary", vec![Rule::Length { min: 1, max: 255 }])
            .rule("description", vec![Rule::Length { min: 0, max: TEXT_MAX }]),
    )
});

pub static EMBED: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("embed")
            .property(PropertyDef::string("url").optional())
            .property(PropertyDef::string("title").optional())
            .property(PropertyDef::string("description").optional())
            .property(PropertyDef::string("image").optional())
            .property(PropertyDef::boolean("nsfw").default_value(false))
            .rule("url", vec![Rule::Url])
            .rule("title", vec![Rule::Length { min: 0, max: 255 }])
            .rule("image", vec![Rule::Url]),
    )
});

pub static STATUS_MESSAGE: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("status_message")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::timestamp("created_at").default_with(now))
            .property(PropertyDef::string("provider_display_name").optional())
            .property(PropertyDef::string("text").alias("raw_message").optional())
            .property(PropertyDef::list("photos", &PHOTO).default_value(Value::List(Vec::new())))
            .property(PropertyDef::entity("location", &LOCATION).optional())
            .property(PropertyDef::entity("poll", &POLL).optional())
            .property(PropertyDef::entity("event", &EVENT).optional())
            .property(PropertyDef::entity("embed", &EMBED).optional())
            .property(PropertyDef::boolean("public").default_value(false))
            .rule("author", vec![Rule::DiasporaId])
            .rule("guid", vec![Rule::Guid])
            .rule("provider_display_name", vec![Rule::Length { min: 0, max: 255 }])
            .rule("text", vec![Rule::Length { min: 0, max: TEXT_MAX }])
            .rule("photos", vec![Rule::ListLength { min: 0, max: 32 }]),
    )
});

pub static RESHARE: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("reshare")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::timestamp("created_at").default_with(now))
            .property(PropertyDef::string("root_author").wire_name("root_diaspora_id").optional())
            .property(PropertyDef::string("root_guid").optional())
            .property(PropertyDef::string("provider_display_name").optional())
            .property(PropertyDef::boolean("public").default_value(true))
            .rule("author", vec![Rule::DiasporaId])
            .rule("guid", vec![Rule::Guid])
            .rule("root_author", vec![Rule::DiasporaId])
            .rule("root_guid", vec![Rule::Guid]),
    )
});
