//! XML element → entity.

use std::collections::BTreeMap;

use federation_model::{
    AdditionalElement, Entity, EntitySchema, PropertyDef, PropertyType, RawContent, Registry, Value,
};

use super::dom::Element;
use crate::coerce::scalar_from_text;
use crate::error::CodecResult;

/// Decodes an entity element. Signatures are not checked and a relayable's
/// parent is not resolved; [`Codec`](crate::Codec) does both.
pub(crate) fn decode(element: &Element, registry: &Registry) -> CodecResult<Entity> {
    let schema = registry.lookup(element.local_name())?;
    decode_with_schema(schema, element)
}

fn decode_with_schema(schema: &'static EntitySchema, element: &Element) -> CodecResult<Entity> {
    let mut builder = Entity::builder(schema);
    let mut lists: BTreeMap<&'static str, Vec<Value>> = BTreeMap::new();
    let mut order = Vec::with_capacity(element.children().len());

    for child in element.children() {
        let tag = child.local_name();
        order.push(tag.to_string());

        if let Some(property) = schema.property_for_tag(tag).filter(|p| p.kind().is_scalar()) {
            if let Some(value) = scalar_from_text(property.kind(), child.text()) {
                builder = builder.set(property.name(), value);
            }
        } else if let Some((property, nested)) = nested_property(schema, tag) {
            let entity = decode_with_schema(nested, child)?;
            match property.kind() {
                PropertyType::List(_) => lists.entry(property.name()).or_default().push(entity.into()),
                _ => builder = builder.set(property.name(), entity),
            }
        } else if child.children().is_empty() {
            builder = builder.additional_element(tag, child.text());
        } else {
            builder = builder.additional(
                AdditionalElement::new(tag, child.inner_text()).with_raw(RawContent::Xml(child.to_xml())),
            );
        }
    }

    for (name, items) in lists {
        builder = builder.set(name, Value::List(items));
    }
    if schema.is_relayable() {
        builder = builder.wire_order(order);
    }
    Ok(builder.build()?)
}

/// The nested property whose elements are named `tag`.
fn nested_property(
    schema: &'static EntitySchema,
    tag: &str,
) -> Option<(&'static PropertyDef, &'static EntitySchema)> {
    schema.properties().iter().find_map(|property| {
        let nested = property.kind().nested()?;
        (nested.name() == tag || property.matches_tag(tag)).then_some((property, nested))
    })
}
