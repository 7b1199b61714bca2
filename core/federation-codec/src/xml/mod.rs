//! The XML entity format.
//!
//! An entity is an element named after its type whose children carry the
//! property values, e.g. `<comment><guid>…</guid><text>…</text></comment>`.
//! Nested entities appear as child elements named after their own type.

mod dom;
mod payload;
mod read;
mod write;

pub use dom::Element;
pub use payload::XmlPayload;
pub(crate) use read::decode;
pub use write::to_element;
