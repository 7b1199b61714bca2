//! Maps wire tags to schemas.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::entities;
use crate::error::{LookupError, SchemaError};
use crate::naming;
use crate::schema::EntitySchema;

/// Lookup table from snake_case tag to schema.
///
/// Only registered types can be decoded, so a wire tag can never name an
/// arbitrary type.
#[derive(Debug, Default)]
pub struct Registry {
    schemas: BTreeMap<&'static str, &'static EntitySchema>,
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| {
    let mut registry = Registry::default();
    for schema in entities::all() {
        registry
            .register(schema)
            .expect("built-in entity names are unique");
    }
    registry
});

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of every built-in entity type.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// A registry holding the built-in types, extendable with custom ones.
    pub fn with_builtin() -> Self {
        Self {
            schemas: BUILTIN.schemas.clone(),
        }
    }

    /// Adds a schema; registering a name twice is an error.
    pub fn register(&mut self, schema: &'static EntitySchema) -> Result<(), SchemaError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateEntity(schema.name().to_string()));
        }
        self.schemas.insert(schema.name(), schema);
        Ok(())
    }

    /// Resolves a snake_case wire tag.
    pub fn lookup(&self, name: &str) -> Result<&'static EntitySchema, LookupError> {
        if !naming::is_valid_entity_name(name) {
            return Err(LookupError::InvalidEntityName(name.to_string()));
        }
        self.schemas
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::UnknownEntity(name.to_string()))
    }

    /// Resolves a CamelCase type name such as `StatusMessage`.
    pub fn lookup_class(&self, class_name: &str) -> Result<&'static EntitySchema, LookupError> {
        let valid = class_name.starts_with(|c: char| c.is_ascii_uppercase())
            && class_name.chars().all(|c| c.is_ascii_alphabetic());
        if !valid {
            return Err(LookupError::InvalidEntityName(class_name.to_string()));
        }
        self.lookup(&naming::underscore(class_name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }
}
