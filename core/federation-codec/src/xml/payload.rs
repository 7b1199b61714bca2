//! The legacy `<XML><post>…</post></XML>` wrapper.

use super::dom::Element;
use crate::error::{CodecError, CodecResult};

const ROOT: &str = "XML";
const POST: &str = "post";

/// Packs and unpacks the legacy entity wrapper.
pub struct XmlPayload;

impl XmlPayload {
    /// Wraps a serialized entity for legacy peers.
    pub fn pack(entity: Element) -> Element {
        Element::new(ROOT).with_child(Element::new(POST).with_child(entity))
    }

    /// Returns the entity element, unwrapping the legacy wrapper if present.
    pub fn unpack(root: &Element) -> CodecResult<&Element> {
        if root.local_name() != ROOT {
            return Ok(root);
        }
        root.child(POST)
            .and_then(|post| post.children().first())
            .ok_or_else(|| CodecError::InvalidRootNode("XML wrapper without a post entity".into()))
    }
}
