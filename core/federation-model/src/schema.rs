//! Declarative entity schemas.
//!
//! Each entity type is an ordered table of [`PropertyDef`]s plus a rule
//! table and an [`EntityKind`]. Construction, validation and both codecs
//! read the same table; nothing is generated per type.

use std::fmt;

use crate::entity::Entity;
use crate::error::SchemaError;
use crate::naming;
use crate::validation::Rule;
use crate::value::Value;

/// Semantic type of a property.
#[derive(Clone, Copy)]
pub enum PropertyType {
    String,
    Integer,
    Boolean,
    Timestamp,
    /// A single nested entity.
    Entity(&'static EntitySchema),
    /// An ordered list of nested entities of one type.
    List(&'static EntitySchema),
}

impl PropertyType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Timestamp => "timestamp",
            Self::Entity(_) => "entity",
            Self::List(_) => "list",
        }
    }

    /// The nested schema for entity and list properties.
    pub fn nested(&self) -> Option<&'static EntitySchema> {
        match self {
            Self::Entity(schema) | Self::List(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.nested().is_none()
    }

    /// Returns true if `value` is an already-constructed value of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Integer, Value::Integer(_))
            | (Self::Boolean, Value::Boolean(_))
            | (Self::Timestamp, Value::Timestamp(_)) => true,
            (Self::Entity(schema), Value::Entity(entity)) => std::ptr::eq(*schema, entity.schema()),
            (Self::List(schema), Value::List(items)) => items.iter().all(|item| {
                item.as_entity()
                    .is_some_and(|entity| std::ptr::eq(*schema, entity.schema()))
            }),
            _ => false,
        }
    }
}

impl fmt::Debug for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(schema) => write!(f, "Entity({})", schema.name()),
            Self::List(schema) => write!(f, "List({})", schema.name()),
            other => f.write_str(other.name()),
        }
    }
}

/// Value applied when a property is absent at construction.
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    /// Called once per construction, e.g. for `created_at = now`.
    Generator(fn() -> Value),
}

impl DefaultValue {
    pub fn produce(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Generator(generate) => generate(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Generator(_) => f.write_str("Generator"),
        }
    }
}

/// One declared property.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    name: &'static str,
    wire_name: Option<&'static str>,
    alias: Option<&'static str>,
    kind: PropertyType,
    default: Option<DefaultValue>,
    optional: bool,
}

impl PropertyDef {
    fn new(name: &'static str, kind: PropertyType) -> Self {
        Self {
            name,
            wire_name: None,
            alias: None,
            kind,
            default: None,
            optional: false,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, PropertyType::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, PropertyType::Integer)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, PropertyType::Boolean)
    }

    pub fn timestamp(name: &'static str) -> Self {
        Self::new(name, PropertyType::Timestamp)
    }

    pub fn entity(name: &'static str, schema: &'static EntitySchema) -> Self {
        Self::new(name, PropertyType::Entity(schema))
    }

    pub fn list(name: &'static str, schema: &'static EntitySchema) -> Self {
        Self::new(name, PropertyType::List(schema))
    }

    /// Element name used on the XML wire instead of the property name.
    #[must_use]
    pub fn wire_name(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Alternative construction key, honored only if the name is absent.
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    #[must_use]
    pub fn default_with(mut self, generate: fn() -> Value) -> Self {
        self.default = Some(DefaultValue::Generator(generate));
        self
    }

    /// Marks the property as allowed to be absent.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The XML element name; falls back to the property name.
    pub fn xml_name(&self) -> &'static str {
        self.wire_name.unwrap_or(self.name)
    }

    pub fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    pub fn kind(&self) -> PropertyType {
        self.kind
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// A property must be supplied when it has neither a default nor the
    /// optional flag.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.optional
    }

    /// Returns true if an XML element called `tag` carries this property.
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.xml_name() == tag || self.name == tag
    }
}

/// How a relayable finds the type of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentType {
    /// Always the same type, e.g. comments belong to a `Post`.
    Fixed(&'static str),
    /// Read from the named property, e.g. a like's `parent_type`.
    Property(&'static str),
}

/// Signature layout of a single-signature entity.
#[derive(Clone, Copy)]
pub struct SignableSpec {
    /// Property holding the signature.
    pub field: &'static str,
    /// Diaspora ID whose key signs the entity.
    pub signer: fn(&Entity) -> Option<String>,
    /// The string that is signed.
    pub data: fn(&Entity) -> String,
}

impl fmt::Debug for SignableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignableSpec")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Signature capability of an entity type.
#[derive(Debug, Clone, Copy)]
pub enum EntityKind {
    Plain,
    Relayable(ParentType),
    Signable(SignableSpec),
}

/// Properties every relayable carries.
const RELAYABLE_AUTHOR: &str = "author";
pub const PARENT_GUID: &str = "parent_guid";
pub const AUTHOR_SIGNATURE: &str = "author_signature";
pub const PARENT_AUTHOR_SIGNATURE: &str = "parent_author_signature";

/// The schema of one entity type.
#[derive(Debug)]
pub struct EntitySchema {
    name: &'static str,
    class_name: String,
    properties: Vec<PropertyDef>,
    rules: Vec<(&'static str, Vec<Rule>)>,
    kind: EntityKind,
}

impl EntitySchema {
    /// Starts a definition for the snake_case type `name`.
    pub fn define(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            properties: Vec::new(),
            rules: Vec::new(),
            kind: EntityKind::Plain,
        }
    }

    /// Wire tag, e.g. `status_message`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// CamelCase type name, e.g. `StatusMessage`.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Finds the property carried by XML element `tag`, preferring the wire
    /// name over the property name.
    pub fn property_for_tag(&self, tag: &str) -> Option<&PropertyDef> {
        self.properties
            .iter()
            .find(|p| p.xml_name() == tag)
            .or_else(|| self.property(tag))
    }

    pub fn rules(&self) -> &[(&'static str, Vec<Rule>)] {
        &self.rules
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_relayable(&self) -> bool {
        matches!(self.kind, EntityKind::Relayable(_))
    }

    pub fn is_signable(&self) -> bool {
        matches!(self.kind, EntityKind::Signable(_))
    }

    /// Returns true if `name` holds a signature and is never itself signed.
    pub fn is_signature_field(&self, name: &str) -> bool {
        match self.kind {
            EntityKind::Relayable(_) => name == AUTHOR_SIGNATURE || name == PARENT_AUTHOR_SIGNATURE,
            EntityKind::Signable(spec) => name == spec.field,
            EntityKind::Plain => false,
        }
    }
}

/// Accumulates a schema definition; [`SchemaBuilder::build`] checks it.
#[must_use]
pub struct SchemaBuilder {
    name: &'static str,
    properties: Vec<PropertyDef>,
    rules: Vec<(&'static str, Vec<Rule>)>,
    kind: EntityKind,
}

impl SchemaBuilder {
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    pub fn rule(mut self, property: &'static str, rules: Vec<Rule>) -> Self {
        self.rules.push((property, rules));
        self
    }

    /// Makes the type relayable and declares the relayable properties ahead
    /// of any type-specific ones.
    pub fn relayable(mut self, parent_type: ParentType) -> Self {
        let mut common = vec![
            PropertyDef::string(RELAYABLE_AUTHOR).wire_name("diaspora_handle"),
            PropertyDef::string("guid"),
            PropertyDef::string(PARENT_GUID),
            PropertyDef::string(AUTHOR_SIGNATURE).optional(),
            PropertyDef::string(PARENT_AUTHOR_SIGNATURE).optional(),
        ];
        common.append(&mut self.properties);
        self.properties = common;
        self.rules.insert(0, (PARENT_GUID, vec![Rule::Guid]));
        self.rules.insert(0, ("guid", vec![Rule::Guid]));
        self.rules
            .insert(0, (RELAYABLE_AUTHOR, vec![Rule::DiasporaId]));
        self.kind = EntityKind::Relayable(parent_type);
        self
    }

    pub fn signable(mut self, spec: SignableSpec) -> Self {
        self.kind = EntityKind::Signable(spec);
        self
    }

    pub fn build(self) -> Result<EntitySchema, SchemaError> {
        if !naming::is_valid_entity_name(self.name) {
            return Err(SchemaError::InvalidName(self.name.to_string()));
        }
        let entity = || self.name.to_string();

        for (i, property) in self.properties.iter().enumerate() {
            let earlier = &self.properties[..i];
            if earlier.iter().any(|p| p.name == property.name) {
                return Err(SchemaError::DuplicateProperty {
                    entity: entity(),
                    property: property.name.to_string(),
                });
            }
            let tags = [Some(property.xml_name()), property.alias];
            for tag in tags.into_iter().flatten() {
                let clash = earlier
                    .iter()
                    .any(|p| p.xml_name() == tag || p.name == tag || p.alias == Some(tag));
                if clash {
                    return Err(SchemaError::DuplicateWireName {
                        entity: entity(),
                        wire_name: tag.to_string(),
                    });
                }
            }
            if let Some(default) = &property.default {
                let value = default.produce();
                if !property.kind.accepts(&value) {
                    return Err(SchemaError::IllTypedDefault {
                        entity: entity(),
                        property: property.name.to_string(),
                    });
                }
            }
        }

        for (property, _) in &self.rules {
            if !self.properties.iter().any(|p| p.name == *property) {
                return Err(SchemaError::UnknownRuleProperty {
                    entity: entity(),
                    property: property.to_string(),
                });
            }
        }

        let mut needed: Vec<&'static str> = Vec::new();
        match self.kind {
            EntityKind::Relayable(parent_type) => {
                if let ParentType::Property(name) = parent_type {
                    needed.push(name);
                }
            }
            EntityKind::Signable(spec) => needed.push(spec.field),
            EntityKind::Plain => {}
        }
        for name in needed {
            if !self.properties.iter().any(|p| p.name == name) {
                return Err(SchemaError::MissingProperty {
                    entity: entity(),
                    property: name.to_string(),
                });
            }
        }

        Ok(EntitySchema {
            name: self.name,
            class_name: naming::camelize(self.name),
            properties: self.properties,
            rules: self.rules,
            kind: self.kind,
        })
    }
}
