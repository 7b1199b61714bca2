//! Entity → XML element.

use federation_model::{AUTHOR_SIGNATURE, AdditionalElement, Entity, PARENT_AUTHOR_SIGNATURE, RawContent, Value};

use super::dom::Element;

/// Serializes an entity as it is; missing signatures stay empty.
///
/// Scalars without a value are written as empty elements. Relayables are
/// written in their signature order followed by the two signatures, so a
/// parsed relayable goes back out in the order it arrived.
pub fn to_element(entity: &Entity) -> Element {
    let mut element = Element::new(entity.entity_type());
    let schema = entity.schema();

    if let Some(relayable) = entity.as_relayable() {
        for tag in relayable.signature_order() {
            let child = match schema.property_for_tag(&tag) {
                Some(property) => Element::leaf(property.xml_name(), scalar_text(entity.get(property.name()))),
                None => entity
                    .find_additional(&tag)
                    .map_or_else(|| Element::leaf(tag.as_str(), ""), additional_to_element),
            };
            element.push_child(child);
        }
        for name in [AUTHOR_SIGNATURE, PARENT_AUTHOR_SIGNATURE] {
            let tag = schema.property(name).map_or(name, |p| p.xml_name());
            element.push_child(Element::leaf(tag, scalar_text(entity.get(name))));
        }
        return element;
    }

    for (property, value) in entity.properties() {
        match value {
            Some(Value::Entity(nested)) => element.push_child(to_element(nested)),
            Some(Value::List(items)) => {
                for nested in items.iter().filter_map(Value::as_entity) {
                    element.push_child(to_element(nested));
                }
            }
            _ if property.kind().is_scalar() => {
                element.push_child(Element::leaf(property.xml_name(), scalar_text(value)));
            }
            _ => {}
        }
    }
    for additional in entity.additional_elements() {
        element.push_child(additional_to_element(additional));
    }
    element
}

/// The element as it arrived, or a text leaf.
fn additional_to_element(additional: &AdditionalElement) -> Element {
    if let Some(RawContent::Xml(xml)) = additional.raw()
        && let Ok(element) = Element::parse(xml)
    {
        return element;
    }
    Element::leaf(additional.name(), additional.text())
}

fn scalar_text(value: Option<&Value>) -> String {
    value.and_then(Value::to_wire_string).unwrap_or_default()
}
