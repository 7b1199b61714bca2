use std::sync::LazyLock;

use super::{TEXT_MAX, builtin};
use crate::entity::Entity;
use crate::schema::{EntitySchema, PropertyDef, SignableSpec};
use crate::validation::Rule;

pub static PROFILE: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("profile")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("first_name").optional())
            .property(PropertyDef::string("last_name").optional())
            .property(PropertyDef::string("image_url").optional())
            .property(PropertyDef::string("image_url_medium").optional())
            .property(PropertyDef::string("image_url_small").optional())
            .property(PropertyDef::string("birthday").optional())
            .property(PropertyDef::string("gender").optional())
            .property(PropertyDef::string("bio").optional())
            .property(PropertyDef::string("location").optional())
            .property(PropertyDef::boolean("searchable").default_value(true))
            .property(PropertyDef::boolean("public").default_value(false))
            .property(PropertyDef::boolean("nsfw").default_value(false))
            .property(PropertyDef::string("tag_string").optional())
            .property(PropertyDef::timestamp("edited_at").optional())
            .rule("author", vec![Rule::DiasporaId])
            .rule("first_name", vec![Rule::Length { min: 0, max: 32 }])
            .rule("last_name", vec![Rule::Length { min: 0, max: 32 }])
            .rule("image_url", vec![Rule::Length { min: 0, max: 255 }])
            .rule("image_url_medium", vec![Rule::Length { min: 0, max: 255 }])
            .rule("image_url_small", vec![Rule::Length { min: 0, max: 255 }])
            .rule("birthday", vec![Rule::Birthday])
            .rule("gender", vec![Rule::Length { min: 0, max: 255 }])
            .rule("bio", vec![Rule::Length { min: 0, max: TEXT_MAX }])
            .rule("location", vec![Rule::Length { min: 0, max: 255 }])
            .rule("tag_string", vec![Rule::TagCount { max: 5 }]),
    )
});

pub static PERSON: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("person")
            .property(PropertyDef::string("guid"))
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .property(PropertyDef::string("url"))
            .property(PropertyDef::entity("profile", &PROFILE))
            .property(PropertyDef::string("exported_key"))
            .rule("guid", vec![Rule::Guid])
            .rule("author", vec![Rule::DiasporaId])
            .rule("url", vec![Rule::Url])
            .rule("exported_key", vec![Rule::NotEmpty]),
    )
});

pub static CONTACT: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("contact")
            .property(PropertyDef::string("author"))
            .property(PropertyDef::string("recipient"))
            .property(PropertyDef::boolean("following").default_value(false))
            .property(PropertyDef::boolean("sharing").default_value(false))
            .property(PropertyDef::boolean("blocking").default_value(false))
            .rule("author", vec![Rule::DiasporaId])
            .rule("recipient", vec![Rule::DiasporaId]),
    )
});

pub static ACCOUNT_DELETION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("account_deletion")
            .property(PropertyDef::string("author").wire_name("diaspora_handle"))
            .rule("author", vec![Rule::DiasporaId]),
    )
});

/// An account moving to a new identity, signed by the new identity's key.
pub static ACCOUNT_MIGRATION: LazyLock<EntitySchema> = LazyLock::new(|| {
    builtin(
        EntitySchema::define("account_migration")
            .property(PropertyDef::string("author"))
            .property(PropertyDef::entity("profile", &PROFILE))
            .property(PropertyDef::string("signature").optional())
            .property(PropertyDef::string("old_identity").optional())
            .rule("author", vec![Rule::DiasporaId])
            .rule("old_identity", vec![Rule::DiasporaId])
            .signable(SignableSpec {
                field: "signature",
                signer: migration_signer,
                data: migration_signature_data,
            }),
    )
});

fn new_identity(entity: &Entity) -> Option<&str> {
    entity.get_entity("profile").and_then(Entity::author)
}

fn migration_signer(entity: &Entity) -> Option<String> {
    new_identity(entity).map(str::to_string)
}

fn migration_signature_data(entity: &Entity) -> String {
    let old_identity = entity
        .get_str("old_identity")
        .or_else(|| entity.author())
        .unwrap_or_default();
    let new_identity = new_identity(entity).unwrap_or_default();
    format!("AccountMigration:{old_identity}:{new_identity}")
}
