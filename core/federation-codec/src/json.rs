//! The JSON entity format.
//!
//! `{"entity_type": "comment", "entity_data": {…}, "property_order": […]}`.
//! Keys in `entity_data` are property names; nested entities use the same
//! wrapper. `property_order` is only written for relayables and carries the
//! order their signatures were computed in.

use std::collections::BTreeMap;

use federation_model::{
    AUTHOR_SIGNATURE, AdditionalElement, Entity, EntitySchema, PARENT_AUTHOR_SIGNATURE, PropertyType,
    RawContent, Registry, Value,
};
use serde_json::{Map, Value as Json};

use crate::coerce::scalar_from_json;
use crate::error::{CodecError, CodecResult};

pub const ENTITY_TYPE: &str = "entity_type";
pub const ENTITY_DATA: &str = "entity_data";
pub const PROPERTY_ORDER: &str = "property_order";

/// Serializes an entity as it is; absent values are omitted.
pub fn to_json(entity: &Entity) -> Json {
    let schema = entity.schema();
    let mut data = Map::new();
    let mut wrapper = Map::new();
    wrapper.insert(ENTITY_TYPE.into(), Json::String(entity.entity_type().into()));

    if let Some(relayable) = entity.as_relayable() {
        let order: Vec<String> = relayable
            .signature_order()
            .into_iter()
            .map(|tag| schema.property_for_tag(&tag).map_or(tag.clone(), |p| p.name().to_string()))
            .collect();
        for key in order.iter().map(String::as_str).chain([AUTHOR_SIGNATURE, PARENT_AUTHOR_SIGNATURE]) {
            let value = match schema.property(key) {
                Some(property) => entity.get(property.name()).map(value_to_json),
                None => entity.find_additional(key).map(additional_to_json),
            };
            if let Some(value) = value {
                data.insert(key.to_string(), value);
            }
        }
        wrapper.insert(ENTITY_DATA.into(), Json::Object(data));
        wrapper.insert(
            PROPERTY_ORDER.into(),
            Json::Array(order.into_iter().map(Json::String).collect()),
        );
        return Json::Object(wrapper);
    }

    for (property, value) in entity.properties() {
        if let Some(value) = value {
            data.insert(property.name().into(), value_to_json(value));
        }
    }
    for additional in entity.additional_elements() {
        data.insert(additional.name().to_string(), additional_to_json(additional));
    }
    wrapper.insert(ENTITY_DATA.into(), Json::Object(data));
    Json::Object(wrapper)
}

/// The value as it arrived, or its text as a string.
fn additional_to_json(additional: &AdditionalElement) -> Json {
    match additional.raw() {
        Some(RawContent::Json(raw)) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Json::String(additional.text().into()))
        }
        _ => Json::String(additional.text().into()),
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Integer(i) => Json::from(*i),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Timestamp(t) => Json::String(t.to_wire()),
        Value::Entity(entity) => to_json(entity),
        Value::List(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Map(data) => Json::Object(
            data.iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect(),
        ),
    }
}

/// Decodes a JSON entity without checking signatures.
pub(crate) fn decode(json: &Json, registry: &Registry) -> CodecResult<Entity> {
    let (entity_type, _) = unwrap_entity(json)?;
    let schema = registry.lookup(entity_type)?;
    decode_with_schema(schema, json)
}

fn unwrap_entity(json: &Json) -> CodecResult<(&str, &Map<String, Json>)> {
    let object = json
        .as_object()
        .ok_or_else(|| CodecError::InvalidStructure("entity must be a JSON object".into()))?;
    let entity_type = object
        .get(ENTITY_TYPE)
        .and_then(Json::as_str)
        .ok_or_else(|| CodecError::InvalidStructure(format!("missing {ENTITY_TYPE}")))?;
    let data = object
        .get(ENTITY_DATA)
        .and_then(Json::as_object)
        .ok_or_else(|| CodecError::InvalidStructure(format!("missing {ENTITY_DATA}")))?;
    Ok((entity_type, data))
}

fn decode_with_schema(schema: &'static EntitySchema, json: &Json) -> CodecResult<Entity> {
    let (entity_type, data) = unwrap_entity(json)?;
    if entity_type != schema.name() {
        return Err(CodecError::InvalidStructure(format!(
            "expected {} but found {entity_type}",
            schema.name()
        )));
    }

    let mut builder = Entity::builder(schema);
    let mut lists: BTreeMap<&'static str, Vec<Value>> = BTreeMap::new();
    for (key, value) in data {
        let Some(property) = schema.property_for_tag(key) else {
            match value {
                Json::Null => {}
                Json::String(s) => builder = builder.additional_element(key.as_str(), s.as_str()),
                other => {
                    let raw = other.to_string();
                    builder = builder.additional(
                        AdditionalElement::new(key.as_str(), raw.as_str()).with_raw(RawContent::Json(raw)),
                    );
                }
            }
            continue;
        };
        match property.kind() {
            PropertyType::Entity(nested) => {
                if !value.is_null() {
                    builder = builder.set(property.name(), decode_with_schema(nested, value)?);
                }
            }
            PropertyType::List(nested) => {
                let items = match value {
                    Json::Null => continue,
                    Json::Array(items) => items,
                    _ => {
                        return Err(CodecError::InvalidStructure(format!(
                            "{} must be an array",
                            property.name()
                        )));
                    }
                };
                let list = lists.entry(property.name()).or_default();
                for item in items {
                    list.push(decode_with_schema(nested, item)?.into());
                }
            }
            kind => {
                if let Some(value) = scalar_from_json(kind, value) {
                    builder = builder.set(property.name(), value);
                }
            }
        }
    }
    for (name, items) in lists {
        builder = builder.set(name, Value::List(items));
    }

    if schema.is_relayable()
        && let Some(order) = json.get(PROPERTY_ORDER).and_then(Json::as_array)
    {
        let order = order
            .iter()
            .map(|tag| {
                tag.as_str().map(str::to_string).ok_or_else(|| {
                    CodecError::InvalidStructure(format!("{PROPERTY_ORDER} must hold strings"))
                })
            })
            .collect::<CodecResult<Vec<_>>>()?;
        builder = builder.wire_order(order);
    }
    Ok(builder.build()?)
}
