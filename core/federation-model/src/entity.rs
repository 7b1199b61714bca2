//! Immutable entity instances.

use std::collections::BTreeMap;
use std::fmt;

use federation_types::Timestamp;

use crate::additional::AdditionalElement;
use crate::error::{ValidationError, Violation};
use crate::related::RelatedEntity;
use crate::schema::{EntitySchema, PropertyDef, PropertyType};
use crate::value::{Data, Value};

/// A validated instance of an [`EntitySchema`].
///
/// There is no mutation API: to change an entity, turn it back into a
/// builder with [`Entity::to_builder`] and build a new one.
#[derive(Clone)]
pub struct Entity {
    schema: &'static EntitySchema,
    values: BTreeMap<&'static str, Value>,
    additional: Vec<AdditionalElement>,
    wire_order: Option<Vec<String>>,
    parent: Option<RelatedEntity>,
}

impl Entity {
    /// Constructs and validates an entity from keyed data.
    pub fn from_data(schema: &'static EntitySchema, data: Data) -> Result<Self, ValidationError> {
        EntityBuilder::new(schema).data(data).build()
    }

    pub fn builder(schema: &'static EntitySchema) -> EntityBuilder {
        EntityBuilder::new(schema)
    }

    /// A builder pre-filled with everything this entity carries.
    pub fn to_builder(&self) -> EntityBuilder {
        EntityBuilder {
            schema: self.schema,
            data: self.to_map(),
            additional: self.additional.clone(),
            wire_order: self.wire_order.clone(),
            parent: self.parent.clone(),
        }
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Snake case type name, e.g. `status_message`.
    pub fn entity_type(&self) -> &'static str {
        self.schema.name()
    }

    pub fn class_name(&self) -> &str {
        self.schema.class_name()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_timestamp(&self, name: &str) -> Option<Timestamp> {
        self.get(name).and_then(Value::as_timestamp)
    }

    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.get(name).and_then(Value::as_entity)
    }

    /// Nested entities of a list property; empty if absent.
    pub fn get_entities(&self, name: &str) -> Vec<&Entity> {
        self.get(name)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::as_entity).collect())
            .unwrap_or_default()
    }

    /// Property definitions paired with their values, in schema order.
    pub fn properties(&self) -> impl Iterator<Item = (&PropertyDef, Option<&Value>)> {
        self.schema
            .properties()
            .iter()
            .map(|p| (p, self.values.get(p.name())))
    }

    pub fn author(&self) -> Option<&str> {
        self.get_str("author")
    }

    pub fn guid(&self) -> Option<&str> {
        self.get_str("guid")
    }

    /// The `public` flag, for types that declare one.
    pub fn public(&self) -> Option<bool> {
        self.get_bool("public")
    }

    /// Text of an element the schema does not declare.
    pub fn additional_element(&self, tag: &str) -> Option<&str> {
        self.find_additional(tag).map(AdditionalElement::text)
    }

    pub fn find_additional(&self, tag: &str) -> Option<&AdditionalElement> {
        self.additional.iter().find(|element| element.name() == tag)
    }

    /// Undeclared elements in the order they were received.
    pub fn additional_elements(&self) -> &[AdditionalElement] {
        &self.additional
    }

    /// Element names in the order they appeared on the wire, if parsed.
    pub fn wire_order(&self) -> Option<&[String]> {
        self.wire_order.as_deref()
    }

    /// The resolved parent of a relayable.
    pub fn parent(&self) -> Option<&RelatedEntity> {
        self.parent.as_ref()
    }

    /// A copy with one more property set, skipping validation. Only used for
    /// signature fields, which carry no rules.
    pub(crate) fn with_value(&self, name: &'static str, value: Value) -> Self {
        let mut entity = self.clone();
        entity.values.insert(name, value);
        entity
    }

    /// Attaches the resolved parent. The parent is not part of the entity's
    /// value and is never serialized.
    #[must_use]
    pub fn with_parent(mut self, parent: RelatedEntity) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Converts back to constructor input, nested entities included.
    pub fn to_map(&self) -> Data {
        self.values
            .iter()
            .map(|(name, value)| ((*name).to_string(), value_to_data(value)))
            .collect()
    }
}

fn value_to_data(value: &Value) -> Value {
    match value {
        Value::Entity(entity) => Value::Map(entity.to_map()),
        Value::List(items) => Value::List(items.iter().map(value_to_data).collect()),
        other => other.clone(),
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema)
            && self.values == other.values
            && self.additional == other.additional
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.class_name());
        for (name, value) in &self.values {
            s.field(name, value);
        }
        if !self.additional.is_empty() {
            s.field("additional", &self.additional);
        }
        s.finish()
    }
}

/// Collects construction input for an [`Entity`].
#[must_use]
pub struct EntityBuilder {
    schema: &'static EntitySchema,
    data: Data,
    additional: Vec<AdditionalElement>,
    wire_order: Option<Vec<String>>,
    parent: Option<RelatedEntity>,
}

impl EntityBuilder {
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            data: Data::new(),
            additional: Vec::new(),
            wire_order: None,
            parent: None,
        }
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    pub fn remove(mut self, name: &str) -> Self {
        self.data.remove(name);
        self
    }

    pub fn data(mut self, data: Data) -> Self {
        self.data.extend(data);
        self
    }

    pub fn additional_element(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional.push(AdditionalElement::new(tag, value));
        self
    }

    pub fn additional(mut self, element: AdditionalElement) -> Self {
        self.additional.push(element);
        self
    }

    pub fn wire_order(mut self, order: Vec<String>) -> Self {
        self.wire_order = Some(order);
        self
    }

    pub fn parent(mut self, parent: RelatedEntity) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Applies aliases and defaults, builds nested entities, checks required
    /// properties and types, then runs the schema's rules.
    pub fn build(self) -> Result<Entity, ValidationError> {
        let schema = self.schema;
        let mut data = self.data;
        let mut violations = Vec::new();

        for property in schema.properties() {
            if let Some(alias) = property.alias_name()
                && let Some(value) = data.remove(alias)
                && !data.contains_key(property.name())
            {
                data.insert(property.name().to_string(), value);
            }
        }

        let mut values = BTreeMap::new();
        for property in schema.properties() {
            let supplied = data.remove(property.name()).filter(|v| !is_blank(v));
            let value = match supplied {
                Some(value) => coerce(property, value, &mut violations),
                None => property.default().map(|d| d.produce()),
            };
            match value {
                Some(value) => {
                    values.insert(property.name(), value);
                }
                None if property.is_required() && !has_violation(&violations, property.name()) => {
                    violations.push(Violation::new(property.name(), None, "required"));
                }
                None => {}
            }
        }

        for (key, value) in data {
            violations.push(Violation::new(key, value.to_wire_string(), "unknown_property"));
        }

        if violations.is_empty() {
            for (name, rules) in schema.rules() {
                let Some(value) = values.get(name) else {
                    continue;
                };
                for rule in rules {
                    if !rule.check(value) {
                        violations.push(rule.violation(name, value));
                    }
                }
            }
        }

        if !violations.is_empty() {
            tracing::debug!(entity = schema.name(), count = violations.len(), "entity validation failed");
            return Err(ValidationError {
                entity: schema.name().to_string(),
                violations,
            });
        }

        Ok(Entity {
            schema,
            values,
            additional: self.additional,
            wire_order: self.wire_order,
            parent: self.parent,
        })
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

fn has_violation(violations: &[Violation], property: &str) -> bool {
    violations.iter().any(|v| {
        v.property == property
            || v.property
                .strip_prefix(property)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

/// Type-checks a supplied value, building nested entities from raw maps.
fn coerce(property: &PropertyDef, value: Value, violations: &mut Vec<Violation>) -> Option<Value> {
    match (property.kind(), value) {
        (PropertyType::Entity(schema), Value::Map(data)) => {
            build_nested(property.name(), schema, data, violations).map(Value::from)
        }
        (PropertyType::List(schema), Value::List(items)) => {
            let mut built = Vec::with_capacity(items.len());
            let mut failed = false;
            for item in items {
                match item {
                    Value::Map(data) => match build_nested(property.name(), schema, data, violations) {
                        Some(entity) => built.push(Value::from(entity)),
                        None => failed = true,
                    },
                    Value::Entity(entity) if std::ptr::eq(entity.schema(), schema) => {
                        built.push(Value::Entity(entity));
                    }
                    other => {
                        violations.push(type_violation(property, &other));
                        failed = true;
                    }
                }
            }
            (!failed).then_some(Value::List(built))
        }
        (kind, value) if kind.accepts(&value) => Some(value),
        (_, value) => {
            violations.push(type_violation(property, &value));
            None
        }
    }
}

fn build_nested(
    name: &str,
    schema: &'static EntitySchema,
    data: Data,
    violations: &mut Vec<Violation>,
) -> Option<Entity> {
    match Entity::from_data(schema, data) {
        Ok(entity) => Some(entity),
        Err(err) => {
            violations.extend(err.violations.into_iter().map(|mut v| {
                v.property = format!("{name}.{}", v.property);
                v
            }));
            None
        }
    }
}

fn type_violation(property: &PropertyDef, value: &Value) -> Violation {
    Violation::new(property.name(), value.to_wire_string(), "type")
        .with_params(vec![("expected", property.kind().name().to_string())])
}
